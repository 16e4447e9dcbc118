//! Boundary error type
//!
//! Every failure kind collapses to the same transport response: HTTP 500
//! with `{"error": "Internal server error"}`. The specific code is logged
//! before the response is built.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::executor::ExecutorError;
use crate::geo::GeoError;
use crate::observability::{Event, Logger};
use crate::planner::PlannerError;

use super::response::ErrorBody;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Resolution(#[from] PlannerError),

    #[error("{0}")]
    Storage(#[from] ExecutorError),

    #[error("{0}")]
    Geo(#[from] GeoError),

    #[error("Worker task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ApiError {
    /// Machine-readable code of the underlying failure
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Resolution(e) => e.code().code(),
            ApiError::Storage(e) => e.code().code(),
            ApiError::Geo(e) => e.code(),
            ApiError::Task(_) => "NW_TASK_FAILED",
        }
    }

    /// Transport status; always 500
    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let event = match &self {
            ApiError::Geo(_) => Event::GeoLookupFailed,
            _ => Event::QueryRejected,
        };
        let reason = self.to_string();
        Logger::event(event, &[("code", self.code()), ("reason", reason.as_str())]);

        (self.status_code(), Json(ErrorBody::internal())).into_response()
    }
}
