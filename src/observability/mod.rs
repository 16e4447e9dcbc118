//! Observability subsystem for northwind
//!
//! - Structured JSON logging with a typed event catalogue
//! - Process-wide counters
//! - The query audit log (`ResponseLogs`) and per-session usage statistics
//!
//! # Principles
//!
//! 1. Observability never fails a request
//! 2. Log output is deterministic: fixed key order, one line per event
//! 3. Usage statistics are derived on read, never stored
//!
//! # Usage
//!
//! ```ignore
//! use northwind::observability::{Event, Logger, MetricsRegistry};
//!
//! Logger::info(Event::TableLoaded, &[("table", "Orders"), ("rows", "830")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.record_query(830);
//! ```

mod audit;
mod events;
mod logger;
mod metrics;
mod timer;
mod usage;

pub use audit::{AuditLogger, AuditRecord};
pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use timer::Timer;
pub use usage::{HistoryEntry, UsageAggregator, UsageStatistics};
