//! Observable events
//!
//! Events are explicit and typed; each carries a default severity.

use std::fmt;

use super::logger::Severity;

/// Observable events in northwind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & lifecycle
    BootBegin,
    ConfigLoaded,
    SchemaInitialized,
    Serving,
    ShutdownComplete,

    // Bulk load
    TableLoaded,
    TableLoadFailed,
    DatasetLoaded,

    // Query pipeline
    QueryBegin,
    QueryComplete,
    QueryRejected,
    AuditWriteFailed,

    // Worker data
    GeoLookupFailed,
}

impl Event {
    /// Every event, in declaration order
    pub const ALL: &'static [Event] = &[
        Event::BootBegin,
        Event::ConfigLoaded,
        Event::SchemaInitialized,
        Event::Serving,
        Event::ShutdownComplete,
        Event::TableLoaded,
        Event::TableLoadFailed,
        Event::DatasetLoaded,
        Event::QueryBegin,
        Event::QueryComplete,
        Event::QueryRejected,
        Event::AuditWriteFailed,
        Event::GeoLookupFailed,
    ];

    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootBegin => "BOOT_BEGIN",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemaInitialized => "SCHEMA_INITIALIZED",
            Event::Serving => "SERVING",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",
            Event::TableLoaded => "TABLE_LOADED",
            Event::TableLoadFailed => "TABLE_LOAD_FAILED",
            Event::DatasetLoaded => "DATASET_LOADED",
            Event::QueryBegin => "QUERY_BEGIN",
            Event::QueryComplete => "QUERY_COMPLETE",
            Event::QueryRejected => "QUERY_REJECTED",
            Event::AuditWriteFailed => "AUDIT_WRITE_FAILED",
            Event::GeoLookupFailed => "GEO_LOOKUP_FAILED",
        }
    }

    /// Default severity for the event
    pub fn severity(&self) -> Severity {
        match self {
            Event::QueryBegin | Event::QueryComplete => Severity::Trace,
            Event::TableLoadFailed | Event::QueryRejected | Event::GeoLookupFailed => {
                Severity::Warn
            }
            Event::AuditWriteFailed => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
