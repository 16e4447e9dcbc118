//! Bulk load errors
//!
//! Error codes:
//! - NW_SOURCE_UNREADABLE (ERROR)
//! - NW_SOURCE_MALFORMED (ERROR)
//! - NW_UNKNOWN_COLUMN (ERROR)
//! - NW_LOAD_STORE_FAILED (ERROR)
//!
//! A load error fails one table; the remaining tables still load.

use std::fmt;

use crate::executor::ExecutorError;

/// Bulk load error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadErrorCode {
    /// Source file missing or unreadable
    NwSourceUnreadable,
    /// Source file is not valid delimited text
    NwSourceMalformed,
    /// Header names a column the table does not have
    NwUnknownColumn,
    /// The store refused a statement
    NwLoadStoreFailed,
}

impl LoadErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            LoadErrorCode::NwSourceUnreadable => "NW_SOURCE_UNREADABLE",
            LoadErrorCode::NwSourceMalformed => "NW_SOURCE_MALFORMED",
            LoadErrorCode::NwUnknownColumn => "NW_UNKNOWN_COLUMN",
            LoadErrorCode::NwLoadStoreFailed => "NW_LOAD_STORE_FAILED",
        }
    }
}

impl fmt::Display for LoadErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Bulk load error with context
#[derive(Debug)]
pub struct LoadError {
    code: LoadErrorCode,
    message: String,
}

impl LoadError {
    pub fn unreadable(path: &str, reason: impl fmt::Display) -> Self {
        Self {
            code: LoadErrorCode::NwSourceUnreadable,
            message: format!("Cannot read {}: {}", path, reason),
        }
    }

    pub fn malformed(path: &str, reason: impl fmt::Display) -> Self {
        Self {
            code: LoadErrorCode::NwSourceMalformed,
            message: format!("Malformed {}: {}", path, reason),
        }
    }

    pub fn unknown_column(table: &str, column: &str) -> Self {
        Self {
            code: LoadErrorCode::NwUnknownColumn,
            message: format!("Table '{}' has no column '{}'", table, column),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> LoadErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ERROR] {}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for LoadError {}

impl From<ExecutorError> for LoadError {
    fn from(err: ExecutorError) -> Self {
        Self {
            code: LoadErrorCode::NwLoadStoreFailed,
            message: err.to_string(),
        }
    }
}

/// Result type for load operations
pub type LoadResult<T> = Result<T, LoadError>;
