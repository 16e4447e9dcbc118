//! Dataset bootstrap for northwind
//!
//! Schema creation (optionally after a full reset) and the startup bulk
//! load from semicolon-delimited files. Loading is per table: a table that
//! fails is reported and the others still load.

mod bulk;
mod errors;
mod schema_init;
mod source;

pub use bulk::{BulkLoader, LoadReport, TableLoad};
pub use errors::{LoadError, LoadErrorCode, LoadResult};
pub use schema_init::initialize_schema;
pub use source::{coerce, CsvSource, DELIMITER};
