//! Worker data HTTP Routes
//!
//! `GET /workerData?ip=`: country code and nearest airport for the given
//! address, or for the caller's own address when `ip` is absent.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, RawQuery, State},
    routing::get,
    Json, Router,
};

use crate::api::ApiResult;
use crate::geo::WorkerData;

use super::state::{caller_ip, query_params, AppState};

pub fn worker_routes(state: AppState) -> Router {
    Router::new()
        .route("/workerData", get(worker_data_handler))
        .with_state(state)
}

async fn worker_data_handler(
    State(state): State<AppState>,
    connect: Option<ConnectInfo<SocketAddr>>,
    RawQuery(raw): RawQuery,
) -> ApiResult<Json<WorkerData>> {
    let ip = query_params(raw.as_deref())
        .remove("ip")
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| caller_ip(connect));

    let result = state.geo.worker_data(Some(&ip)).await;
    state.metrics.record_geo_lookup(result.is_ok());
    Ok(Json(result?))
}
