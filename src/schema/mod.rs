//! Schema Registry for northwind
//!
//! Static mapping from logical table name to column definitions and
//! primary-key identity. The set of tables is fixed at build time.
//!
//! # Design Principles
//!
//! - Lookup is exact and case-sensitive
//! - No dynamic registration
//! - Descriptors are `'static` and immutable

pub mod ddl;
mod errors;
mod registry;
mod types;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult};
pub use registry::{SchemaRegistry, RESPONSE_LOGS, TABLES};
pub use types::{ColumnDef, ColumnType, TableDescriptor};
