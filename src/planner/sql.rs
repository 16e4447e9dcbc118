//! SQL construction and audit rendering
//!
//! Statements are assembled clause by clause in a fixed order:
//!
//! ```text
//! SELECT .. FROM .. [LEFT JOIN ..] [WHERE ..] [GROUP BY ..] [ORDER BY ..] [LIMIT n] [OFFSET m]
//! ```
//!
//! Predicate values are always bound as `?` parameters. The rendered copy
//! with parameters interpolated exists only for the audit log and is never
//! executed.

use std::fmt;

use serde::Serialize;

use super::query::{Limit, Pagination};

/// A bound parameter value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SqlParam {
    Integer(i64),
    Text(String),
}

impl SqlParam {
    /// SQL literal form, for rendering only
    pub fn literal(&self) -> String {
        match self {
            SqlParam::Integer(n) => n.to_string(),
            SqlParam::Text(s) => format!("'{}'", s.replace('\'', "''")),
        }
    }
}

impl fmt::Display for SqlParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.literal())
    }
}

/// What a resolved statement does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueryKind {
    List,
    GetById,
    Search,
    Count,
}

/// A ready-to-execute statement plus its audit rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedQuery {
    /// Target table
    pub table: &'static str,
    /// Statement kind
    pub kind: QueryKind,
    /// Statement text with `?` placeholders
    pub sql: String,
    /// Values bound to the placeholders, in order
    pub params: Vec<SqlParam>,
    /// Statement text with parameters interpolated (audit only)
    pub rendered: String,
    /// Rows the executor discards before collecting.
    ///
    /// Non-zero only for unbounded pages with an offset: no `LIMIT` literal
    /// is emitted and SQLite does not accept `OFFSET` on its own.
    pub skip: u64,
}

/// Substitutes parameters into `?` placeholders outside string literals
pub fn render(sql: &str, params: &[SqlParam]) -> String {
    let mut out = String::with_capacity(sql.len() + params.len() * 8);
    let mut params = params.iter();
    let mut in_literal = false;

    for c in sql.chars() {
        match c {
            '\'' => {
                in_literal = !in_literal;
                out.push(c);
            }
            '?' if !in_literal => match params.next() {
                Some(p) => out.push_str(&p.literal()),
                None => out.push(c),
            },
            _ => out.push(c),
        }
    }
    out
}

/// Clause-ordered SELECT builder
#[derive(Debug, Clone)]
pub(crate) struct SelectBuilder {
    table: &'static str,
    kind: QueryKind,
    head: String,
    predicate: Option<(String, SqlParam)>,
    group_by: Option<String>,
    order_by: Option<String>,
    pagination: Option<Pagination>,
}

impl SelectBuilder {
    /// Starts from a projection (`SELECT .. FROM ..` plus any joins)
    pub fn new(table: &'static str, kind: QueryKind, head: impl Into<String>) -> Self {
        Self {
            table,
            kind,
            head: head.into(),
            predicate: None,
            group_by: None,
            order_by: None,
            pagination: None,
        }
    }

    /// Adds a single-parameter predicate; `condition` contains one `?`
    pub fn filter(mut self, condition: impl Into<String>, param: SqlParam) -> Self {
        self.predicate = Some((condition.into(), param));
        self
    }

    pub fn group_by(mut self, columns: impl Into<String>) -> Self {
        self.group_by = Some(columns.into());
        self
    }

    pub fn order_by(mut self, columns: impl Into<String>) -> Self {
        let columns = columns.into();
        if !columns.is_empty() {
            self.order_by = Some(columns);
        }
        self
    }

    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn build(self) -> ResolvedQuery {
        let mut sql = self.head;
        let mut params = Vec::new();
        let mut skip = 0;

        if let Some((condition, param)) = self.predicate {
            sql.push_str(" WHERE ");
            sql.push_str(&condition);
            params.push(param);
        }
        if let Some(group_by) = self.group_by {
            sql.push_str(" GROUP BY ");
            sql.push_str(&group_by);
        }
        if let Some(order_by) = self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(&order_by);
        }
        if let Some(Pagination { limit, offset }) = self.pagination {
            match limit {
                Limit::Bounded(n) => {
                    sql.push_str(&format!(" LIMIT {}", n));
                    if offset > 0 {
                        sql.push_str(&format!(" OFFSET {}", offset));
                    }
                }
                Limit::Unbounded => skip = offset,
            }
        }

        let rendered = render(&sql, &params);
        ResolvedQuery {
            table: self.table,
            kind: self.kind,
            sql,
            params,
            rendered,
            skip,
        }
    }
}
