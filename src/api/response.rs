//! API response types

use serde::Serialize;

use crate::executor::Row;
use crate::observability::{HistoryEntry, UsageStatistics};

/// Table endpoint response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableResponse {
    /// Total rows in the table, from the companion count query
    pub count: i64,
    /// Rows of the primary query
    pub data: Vec<Row>,
}

/// `/responseLogs` response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseLogsView {
    pub stats: UsageStatistics,
    pub history: Vec<HistoryEntry>,
}

/// Transport failure body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}

impl ErrorBody {
    pub fn internal() -> Self {
        Self {
            error: "Internal server error",
        }
    }
}
