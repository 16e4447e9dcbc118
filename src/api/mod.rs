//! API layer for northwind
//!
//! Orchestrates resolver, executor and audit log behind one service. The
//! single boundary adapter, `ApiError`, maps every failure to the generic
//! transport error.

mod errors;
mod request;
mod response;
mod service;

pub use errors::{ApiError, ApiResult};
pub use request::{CallerContext, DEFAULT_SESSION_ID};
pub use response::{ErrorBody, ResponseLogsView, TableResponse};
pub use service::QueryService;
