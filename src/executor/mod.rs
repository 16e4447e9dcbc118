//! Data Access Executor subsystem for northwind
//!
//! Runs resolved statements against the relational store and returns rows
//! plus a row count.
//!
//! # Failure kinds
//!
//! - `NW_STORAGE_UNAVAILABLE`: the store cannot be reached
//! - `NW_QUERY_REJECTED`: the store refused the statement
//!
//! Reads have no side effects.

mod errors;
mod executor;
mod result;
mod store;

pub use errors::{ExecutorError, ExecutorErrorCode, ExecutorResult};
pub use executor::{QueryExecutor, SharedStore};
pub use result::ExecutionResult;
pub use store::{Row, SqliteStore, Store, StoreValue};
