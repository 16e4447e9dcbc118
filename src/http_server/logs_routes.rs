//! Response log HTTP Routes
//!
//! `GET /responseLogs`: usage statistics and history for the session named
//! by the `session-id` header.

use axum::{extract::State, http::HeaderMap, routing::get, Json, Router};

use crate::api::{ApiResult, ResponseLogsView, DEFAULT_SESSION_ID};

use super::state::{session_id, AppState};

pub fn logs_routes(state: AppState) -> Router {
    Router::new()
        .route("/responseLogs", get(response_logs_handler))
        .with_state(state)
}

async fn response_logs_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<ResponseLogsView>> {
    let session = session_id(&headers)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SESSION_ID)
        .to_string();

    let service = state.service.clone();
    let view = tokio::task::spawn_blocking(move || service.response_logs(&session)).await??;
    Ok(Json(view))
}
