//! northwind - read-only HTTP query service over the Northwind dataset
//!
//! Requests are resolved to parameterized SQL, executed against SQLite and
//! recorded in a per-session audit log that feeds usage statistics.

pub mod api;
pub mod cli;
pub mod executor;
pub mod geo;
pub mod http_server;
pub mod loader;
pub mod observability;
pub mod planner;
pub mod schema;
