//! Metrics registry
//!
//! Counters only, monotonic, reset on process start. Increments use
//! `Relaxed` ordering; readers see eventually-consistent values.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    requests_served: AtomicU64,
    queries_executed: AtomicU64,
    rows_returned: AtomicU64,
    resolution_errors: AtomicU64,
    storage_errors: AtomicU64,
    audit_writes: AtomicU64,
    audit_failures: AtomicU64,
    rows_loaded: AtomicU64,
    tables_failed: AtomicU64,
    geo_lookups: AtomicU64,
    geo_failures: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// A table request completed successfully
    pub fn increment_requests_served(&self) {
        self.requests_served.fetch_add(1, Ordering::Relaxed);
    }

    /// A statement ran and returned `rows` rows
    pub fn record_query(&self, rows: u64) {
        self.queries_executed.fetch_add(1, Ordering::Relaxed);
        self.rows_returned.fetch_add(rows, Ordering::Relaxed);
    }

    pub fn increment_resolution_errors(&self) {
        self.resolution_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_storage_errors(&self) {
        self.storage_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_audit_writes(&self) {
        self.audit_writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_audit_failures(&self) {
        self.audit_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Bulk load progress
    pub fn add_rows_loaded(&self, rows: u64) {
        self.rows_loaded.fetch_add(rows, Ordering::Relaxed);
    }

    pub fn increment_tables_failed(&self) {
        self.tables_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Worker-data lookup finished, successfully or not
    pub fn record_geo_lookup(&self, ok: bool) {
        self.geo_lookups.fetch_add(1, Ordering::Relaxed);
        if !ok {
            self.geo_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        let load = |c: &AtomicU64| c.load(Ordering::Relaxed);
        MetricsSnapshot {
            requests_served: load(&self.requests_served),
            queries_executed: load(&self.queries_executed),
            rows_returned: load(&self.rows_returned),
            resolution_errors: load(&self.resolution_errors),
            storage_errors: load(&self.storage_errors),
            audit_writes: load(&self.audit_writes),
            audit_failures: load(&self.audit_failures),
            rows_loaded: load(&self.rows_loaded),
            tables_failed: load(&self.tables_failed),
            geo_lookups: load(&self.geo_lookups),
            geo_failures: load(&self.geo_failures),
        }
    }

    /// Current values as a JSON object
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self.snapshot()).unwrap_or_default()
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MetricsSnapshot {
    pub requests_served: u64,
    pub queries_executed: u64,
    pub rows_returned: u64,
    pub resolution_errors: u64,
    pub storage_errors: u64,
    pub audit_writes: u64,
    pub audit_failures: u64,
    pub rows_loaded: u64,
    pub tables_failed: u64,
    pub geo_lookups: u64,
    pub geo_failures: u64,
}
