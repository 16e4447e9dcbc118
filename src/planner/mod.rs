//! Query Resolver subsystem for northwind
//!
//! Turns an abstract request (table, list / get-by-id / search, pagination)
//! into an executable statement plus its human-readable rendering for the
//! audit log.
//!
//! # Design Principles
//!
//! - SQL text is built in one place, clause by clause, in a fixed order
//! - Predicate values are bound, never spliced into executed text
//! - An unbounded limit is never rendered as a literal
//! - `OFFSET` is emitted only when strictly positive

mod errors;
mod query;
mod resolver;
mod sql;

pub use errors::{PlannerError, PlannerErrorCode, PlannerResult};
pub use query::{Limit, Pagination, QueryMode, QueryRequest, RawParams};
pub use resolver::{QueryResolver, TableStrategy};
pub use sql::{render, QueryKind, ResolvedQuery, SqlParam};
