//! Result types for query execution

use serde::Serialize;

use super::store::Row;

/// Result of executing a resolved query
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExecutionResult {
    /// Rows in result order
    pub rows: Vec<Row>,
    /// Number of rows returned
    #[serde(rename = "rowCount")]
    pub row_count: usize,
}

impl ExecutionResult {
    /// Creates a result from collected rows
    pub fn new(rows: Vec<Row>) -> Self {
        let row_count = rows.len();
        Self { rows, row_count }
    }

    /// Creates an empty result
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if no rows matched
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of rows
    pub fn len(&self) -> usize {
        self.row_count
    }

    /// Consumes the result, returning its rows
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}
