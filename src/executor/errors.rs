//! Executor error types
//!
//! Error codes:
//! - NW_STORAGE_UNAVAILABLE (ERROR)
//! - NW_QUERY_REJECTED (ERROR)
//!
//! Neither is fatal to the process: a failed statement fails only the
//! request that issued it.

use std::fmt;

use rusqlite::ErrorCode;

/// Executor error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorErrorCode {
    /// The store cannot be reached (open failure, busy, locked, not a database)
    NwStorageUnavailable,
    /// The store refused the statement (syntax, missing table, constraint)
    NwQueryRejected,
}

impl ExecutorErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ExecutorErrorCode::NwStorageUnavailable => "NW_STORAGE_UNAVAILABLE",
            ExecutorErrorCode::NwQueryRejected => "NW_QUERY_REJECTED",
        }
    }
}

impl fmt::Display for ExecutorErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Executor error type with context
#[derive(Debug)]
pub struct ExecutorError {
    code: ExecutorErrorCode,
    message: String,
}

impl ExecutorError {
    /// Store unreachable
    pub fn storage_unavailable(reason: impl Into<String>) -> Self {
        Self {
            code: ExecutorErrorCode::NwStorageUnavailable,
            message: reason.into(),
        }
    }

    /// Statement refused by the store
    pub fn query_rejected(reason: impl Into<String>) -> Self {
        Self {
            code: ExecutorErrorCode::NwQueryRejected,
            message: reason.into(),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> ExecutorErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the store itself is unreachable
    pub fn is_unavailable(&self) -> bool {
        self.code == ExecutorErrorCode::NwStorageUnavailable
    }
}

impl fmt::Display for ExecutorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ERROR] {}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for ExecutorError {}

impl From<rusqlite::Error> for ExecutorError {
    fn from(err: rusqlite::Error) -> Self {
        let unavailable = matches!(
            &err,
            rusqlite::Error::SqliteFailure(e, _)
                if matches!(
                    e.code,
                    ErrorCode::CannotOpen
                        | ErrorCode::DatabaseBusy
                        | ErrorCode::DatabaseLocked
                        | ErrorCode::NotADatabase
                        | ErrorCode::PermissionDenied
                        | ErrorCode::SystemIoFailure
                )
        );
        if unavailable {
            ExecutorError::storage_unavailable(err.to_string())
        } else {
            ExecutorError::query_rejected(err.to_string())
        }
    }
}

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(code: std::os::raw::c_int) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(rusqlite::ffi::Error::new(code), None)
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ExecutorErrorCode::NwStorageUnavailable.code(),
            "NW_STORAGE_UNAVAILABLE"
        );
        assert_eq!(ExecutorErrorCode::NwQueryRejected.code(), "NW_QUERY_REJECTED");
    }

    #[test]
    fn test_busy_is_unavailable() {
        let err: ExecutorError = failure(rusqlite::ffi::SQLITE_BUSY).into();
        assert!(err.is_unavailable());

        let err: ExecutorError = failure(rusqlite::ffi::SQLITE_CANTOPEN).into();
        assert!(err.is_unavailable());
    }

    #[test]
    fn test_syntax_is_rejected() {
        let err: ExecutorError = failure(rusqlite::ffi::SQLITE_ERROR).into();
        assert_eq!(err.code(), ExecutorErrorCode::NwQueryRejected);

        let err: ExecutorError = rusqlite::Error::QueryReturnedNoRows.into();
        assert_eq!(err.code(), ExecutorErrorCode::NwQueryRejected);
    }

    #[test]
    fn test_error_display() {
        let err = ExecutorError::query_rejected("no such table: Widgets");
        let display = format!("{}", err);
        assert!(display.contains("NW_QUERY_REJECTED"));
        assert!(display.contains("Widgets"));
    }
}
