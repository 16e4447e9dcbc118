//! Query audit logging
//!
//! Every served table request appends records to the `ResponseLogs` table:
//! one for the primary data query and one for its companion count query.
//! The log is append-only; it is only ever cleared by a full schema reset.
//!
//! Recording is fire-and-forget. A failed write is reported through the
//! structured logger and a metrics counter and never reaches the caller.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::executor::{ExecutorResult, SharedStore, StoreValue};
use crate::schema::RESPONSE_LOGS;

use super::events::Event;
use super::logger::Logger;
use super::metrics::MetricsRegistry;

/// Columns written for each record, in insert order
pub(crate) const AUDIT_COLUMNS: &[&str] = &[
    "SessionID",
    "SessionIP",
    "queriedAt",
    "Query",
    "RowsReturned",
    "ResponseTime",
];

/// A single audit record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    /// Caller-supplied session identifier
    pub session_id: String,
    /// Caller address
    pub session_ip: String,
    /// Wall-clock time the record was taken
    pub queried_at: DateTime<Utc>,
    /// Rendered statement text
    pub query: String,
    /// Rows returned, or the answer of a count query
    pub rows_returned: i64,
    /// Milliseconds since the request started
    pub response_time_ms: f64,
}

impl AuditRecord {
    /// Creates a record stamped now
    pub fn new(
        session_id: impl Into<String>,
        session_ip: impl Into<String>,
        query: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            session_ip: session_ip.into(),
            queried_at: Utc::now(),
            query: query.into(),
            rows_returned: 0,
            response_time_ms: 0.0,
        }
    }

    /// Set rows returned.
    pub fn with_rows(mut self, rows: i64) -> Self {
        self.rows_returned = rows;
        self
    }

    /// Set response time in milliseconds.
    pub fn with_response_time(mut self, ms: f64) -> Self {
        self.response_time_ms = ms;
        self
    }

    /// Override the timestamp.
    pub fn at(mut self, queried_at: DateTime<Utc>) -> Self {
        self.queried_at = queried_at;
        self
    }

    fn to_values(&self) -> Vec<StoreValue> {
        vec![
            StoreValue::Text(self.session_id.clone()),
            StoreValue::Text(self.session_ip.clone()),
            StoreValue::Text(self.queried_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
            StoreValue::Text(self.query.clone()),
            StoreValue::Integer(self.rows_returned),
            StoreValue::Real(self.response_time_ms),
        ]
    }
}

/// Appends audit records to the store
#[derive(Clone)]
pub struct AuditLogger {
    store: SharedStore,
    metrics: Arc<MetricsRegistry>,
}

impl AuditLogger {
    pub fn new(store: SharedStore, metrics: Arc<MetricsRegistry>) -> Self {
        Self { store, metrics }
    }

    /// Appends a record. Failures are logged, never returned.
    pub fn record(&self, record: AuditRecord) {
        match self.try_record(&record) {
            Ok(()) => self.metrics.increment_audit_writes(),
            Err(err) => {
                self.metrics.increment_audit_failures();
                Logger::error(
                    Event::AuditWriteFailed,
                    &[
                        ("code", err.code().code()),
                        ("reason", err.message()),
                        ("session_id", record.session_id.as_str()),
                    ],
                );
            }
        }
    }

    /// Appends a record, surfacing the store error
    pub fn try_record(&self, record: &AuditRecord) -> ExecutorResult<()> {
        self.store
            .insert(RESPONSE_LOGS, AUDIT_COLUMNS, &[record.to_values()])
            .map(|_| ())
    }
}
