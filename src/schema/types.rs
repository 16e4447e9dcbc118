//! Table and column descriptors
//!
//! Descriptors are immutable `'static` data: the catalogue is fixed at
//! build time and never registered dynamically.

use serde::Serialize;

/// Semantic column types, mirroring SQLite storage classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// 64-bit signed integer
    Integer,
    /// UTF-8 text
    Text,
    /// Floating point
    Real,
    /// Raw bytes
    Blob,
}

impl ColumnType {
    /// Returns the type name used in DDL
    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Text => "VARCHAR(1000)",
            ColumnType::Real => "REAL",
            ColumnType::Blob => "BLOB",
        }
    }

    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Text => "text",
            ColumnType::Real => "real",
            ColumnType::Blob => "blob",
        }
    }
}

/// A single column definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnDef {
    /// Column name, case-sensitive
    pub name: &'static str,
    /// Storage type
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Whether NULL is accepted
    pub nullable: bool,
}

impl ColumnDef {
    /// Nullable column
    pub const fn optional(name: &'static str, column_type: ColumnType) -> Self {
        Self {
            name,
            column_type,
            nullable: true,
        }
    }

    /// NOT NULL column
    pub const fn required(name: &'static str, column_type: ColumnType) -> Self {
        Self {
            name,
            column_type,
            nullable: false,
        }
    }
}

/// Logical table description
///
/// `identity` lists the primary-key column(s). A table is addressable by id
/// only when it has exactly one identity column, and searchable only when
/// `search_column` names a text column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableDescriptor {
    /// Logical (and physical) table name
    pub name: &'static str,
    /// Ordered column list
    pub columns: &'static [ColumnDef],
    /// Identity column names
    pub identity: &'static [&'static str],
    /// Designated substring-search column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_column: Option<&'static str>,
    /// HTTP path segment the table is served under
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<&'static str>,
}

impl TableDescriptor {
    /// Looks up a column by exact name
    pub fn column(&self, name: &str) -> Option<&'static ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns the single identity column, if the table has exactly one
    pub fn identity_column(&self) -> Option<&'static ColumnDef> {
        match self.identity {
            [single] => self.column(single),
            _ => None,
        }
    }

    /// Returns the searchable text column, if any
    pub fn searchable_column(&self) -> Option<&'static ColumnDef> {
        self.search_column.and_then(|name| self.column(name))
    }

    /// Column names in declaration order
    pub fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.name)
    }

    /// Whether the column is part of the primary key
    pub fn is_identity(&self, column: &str) -> bool {
        self.identity.contains(&column)
    }
}
