//! Abstract query requests
//!
//! A request names a table, a mode and pagination. Parsing from raw
//! request parameters is lenient: malformed numbers fall back to the
//! defaults instead of rejecting the request.

use serde::Serialize;

/// Row limit for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Limit {
    /// At most `n` rows, `n > 0`
    Bounded(u64),
    /// No limit; never rendered as a literal
    #[default]
    Unbounded,
}

impl Limit {
    /// Creates a limit, treating zero as unbounded
    pub fn new(n: u64) -> Self {
        if n == 0 {
            Limit::Unbounded
        } else {
            Limit::Bounded(n)
        }
    }

    /// Parses a raw parameter; anything that is not a positive integer
    /// means unbounded
    pub fn parse(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|n| *n > 0)
            .map(|n| Limit::Bounded(n as u64))
            .unwrap_or(Limit::Unbounded)
    }

    /// Returns the bound, if any
    pub fn get(&self) -> Option<u64> {
        match self {
            Limit::Bounded(n) => Some(*n),
            Limit::Unbounded => None,
        }
    }

    /// Whether a bound is present
    pub fn is_bounded(&self) -> bool {
        matches!(self, Limit::Bounded(_))
    }
}

/// Pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Pagination {
    pub limit: Limit,
    pub offset: u64,
}

impl Pagination {
    /// Creates a pagination window
    pub fn new(limit: Limit, offset: u64) -> Self {
        Self { limit, offset }
    }

    /// Unbounded window starting at row zero
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Parses raw `limit` / `offset` parameters
    pub fn parse(limit: Option<&str>, offset: Option<&str>) -> Self {
        let offset = offset
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|n| *n > 0)
            .map(|n| n as u64)
            .unwrap_or(0);
        Self {
            limit: Limit::parse(limit),
            offset,
        }
    }
}

/// Request shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryMode {
    /// Paginated full listing
    List,
    /// Equality on the identity column
    GetById { id: String },
    /// Substring match on the search column
    Search {
        key: Option<String>,
        substring: String,
    },
}

impl QueryMode {
    /// Returns the mode name for logs
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryMode::List => "list",
            QueryMode::GetById { .. } => "get-by-id",
            QueryMode::Search { .. } => "search-substring",
        }
    }
}

/// An abstract query against one logical table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    /// Logical table name
    pub table: String,
    /// Request shape
    pub mode: QueryMode,
    /// Pagination; only list requests apply it
    pub pagination: Pagination,
}

impl QueryRequest {
    /// Paginated list request
    pub fn list(table: impl Into<String>, pagination: Pagination) -> Self {
        Self {
            table: table.into(),
            mode: QueryMode::List,
            pagination,
        }
    }

    /// Get-by-id request
    pub fn get_by_id(table: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            mode: QueryMode::GetById { id: id.into() },
            pagination: Pagination::unbounded(),
        }
    }

    /// Substring search request
    pub fn search(
        table: impl Into<String>,
        key: Option<String>,
        substring: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            mode: QueryMode::Search {
                key,
                substring: substring.into(),
            },
            pagination: Pagination::unbounded(),
        }
    }

    /// Builds a request from raw parameters.
    ///
    /// Precedence: a non-empty `id` selects get-by-id; otherwise a
    /// non-empty `where_like` selects search; otherwise list.
    pub fn from_params(table: impl Into<String>, params: &RawParams<'_>) -> Self {
        let table = table.into();
        let non_empty = |v: Option<&str>| v.filter(|s| !s.is_empty()).map(str::to_string);

        if let Some(id) = non_empty(params.id) {
            return Self::get_by_id(table, id);
        }
        if let Some(substring) = non_empty(params.where_like) {
            return Self::search(table, non_empty(params.where_key), substring);
        }
        Self::list(table, Pagination::parse(params.limit, params.offset))
    }
}

/// Raw, unvalidated request parameters
#[derive(Debug, Clone, Copy, Default)]
pub struct RawParams<'a> {
    pub limit: Option<&'a str>,
    pub offset: Option<&'a str>,
    pub id: Option<&'a str>,
    pub where_key: Option<&'a str>,
    pub where_like: Option<&'a str>,
}
