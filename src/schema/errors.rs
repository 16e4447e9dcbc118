//! Schema registry errors
//!
//! Error codes:
//! - NW_UNKNOWN_TABLE (REJECT)

use std::fmt;

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Table name not present in the catalogue
    NwUnknownTable,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::NwUnknownTable => "NW_UNKNOWN_TABLE",
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema lookup failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    code: SchemaErrorCode,
    table: String,
}

impl SchemaError {
    /// Table (or route) was not found
    pub fn not_found(table: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::NwUnknownTable,
            table: table.into(),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the name that failed to resolve
    pub fn table(&self) -> &str {
        &self.table
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REJECT] {}: table '{}' not found", self.code, self.table)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema lookups
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SchemaError::not_found("Widgets");
        let display = err.to_string();
        assert!(display.contains("NW_UNKNOWN_TABLE"));
        assert!(display.contains("Widgets"));
    }
}
