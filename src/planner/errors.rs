//! Query resolution errors
//!
//! Error codes:
//! - NW_UNKNOWN_TABLE (REJECT)
//! - NW_INVALID_ID (REJECT)
//! - NW_NO_IDENTITY (REJECT)
//! - NW_NOT_SEARCHABLE (REJECT)
//! - NW_INVALID_SEARCH_KEY (REJECT)
//!
//! Every resolution error is a rejection of the request; none of them
//! indicate a fault in the process.

use std::fmt;

use crate::schema::SchemaError;

/// Resolution error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerErrorCode {
    /// Table is not in the catalogue
    NwUnknownTable,
    /// Id could not be coerced to the identity column type
    NwInvalidId,
    /// Table has no single identity column
    NwNoIdentity,
    /// Table has no designated search column
    NwNotSearchable,
    /// Search key does not name the search column
    NwInvalidSearchKey,
}

impl PlannerErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            PlannerErrorCode::NwUnknownTable => "NW_UNKNOWN_TABLE",
            PlannerErrorCode::NwInvalidId => "NW_INVALID_ID",
            PlannerErrorCode::NwNoIdentity => "NW_NO_IDENTITY",
            PlannerErrorCode::NwNotSearchable => "NW_NOT_SEARCHABLE",
            PlannerErrorCode::NwInvalidSearchKey => "NW_INVALID_SEARCH_KEY",
        }
    }
}

impl fmt::Display for PlannerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Resolution error with context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerError {
    code: PlannerErrorCode,
    message: String,
    table: String,
}

impl PlannerError {
    /// Unknown table
    pub fn unknown_table(table: impl Into<String>) -> Self {
        let t = table.into();
        Self {
            code: PlannerErrorCode::NwUnknownTable,
            message: format!("Table '{}' not found", t),
            table: t,
        }
    }

    /// Id failed to parse for the identity column
    pub fn invalid_id(table: impl Into<String>, id: &str, expected: &str) -> Self {
        Self {
            code: PlannerErrorCode::NwInvalidId,
            message: format!("Id '{}' is not a valid {}", id, expected),
            table: table.into(),
        }
    }

    /// Table cannot be addressed by id
    pub fn no_identity(table: impl Into<String>) -> Self {
        let t = table.into();
        Self {
            code: PlannerErrorCode::NwNoIdentity,
            message: format!("Table '{}' has no single identity column", t),
            table: t,
        }
    }

    /// Table not searchable
    pub fn not_searchable(table: impl Into<String>) -> Self {
        let t = table.into();
        Self {
            code: PlannerErrorCode::NwNotSearchable,
            message: format!("Table '{}' not searchable", t),
            table: t,
        }
    }

    /// Search key names the wrong column
    pub fn invalid_search_key(table: impl Into<String>, key: &str, expected: &str) -> Self {
        Self {
            code: PlannerErrorCode::NwInvalidSearchKey,
            message: format!("Search key '{}' is not searchable, expected '{}'", key, expected),
            table: table.into(),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> PlannerErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the table the request targeted
    pub fn table(&self) -> &str {
        &self.table
    }
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REJECT] {}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for PlannerError {}

impl From<SchemaError> for PlannerError {
    fn from(err: SchemaError) -> Self {
        PlannerError::unknown_table(err.table())
    }
}

/// Result type for resolver operations
pub type PlannerResult<T> = Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(PlannerErrorCode::NwUnknownTable.code(), "NW_UNKNOWN_TABLE");
        assert_eq!(PlannerErrorCode::NwInvalidId.code(), "NW_INVALID_ID");
        assert_eq!(PlannerErrorCode::NwNotSearchable.code(), "NW_NOT_SEARCHABLE");
    }

    #[test]
    fn test_error_display() {
        let err = PlannerError::not_searchable("Orders");
        let display = format!("{}", err);
        assert!(display.contains("NW_NOT_SEARCHABLE"));
        assert!(display.contains("not searchable"));
        assert_eq!(err.table(), "Orders");
    }

    #[test]
    fn test_from_schema_error() {
        let err: PlannerError = SchemaError::not_found("Widgets").into();
        assert_eq!(err.code(), PlannerErrorCode::NwUnknownTable);
        assert_eq!(err.table(), "Widgets");
    }
}
