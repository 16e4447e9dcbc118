//! Startup bulk load
//!
//! For each business table: open its source, clear the table, then insert
//! in chunked multi-row statements. A failing table is logged and skipped;
//! the audit table is never touched.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::executor::SharedStore;
use crate::observability::{Event, Logger, MetricsRegistry, Timer};
use crate::schema::ddl::quote_ident;
use crate::schema::{SchemaRegistry, TableDescriptor};

use super::errors::LoadResult;
use super::source::CsvSource;

/// Bound parameters per insert statement
const MAX_PARAMS_PER_STATEMENT: usize = 999;

/// Outcome for one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableLoad {
    pub table: &'static str,
    /// Rows inserted, when the table loaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
    /// Failure reason, when it did not
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TableLoad {
    pub fn is_loaded(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcome of a full dataset load
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub tables: Vec<TableLoad>,
}

impl LoadReport {
    /// Total rows inserted across loaded tables
    pub fn rows_loaded(&self) -> usize {
        self.tables.iter().filter_map(|t| t.rows).sum()
    }

    pub fn loaded(&self) -> impl Iterator<Item = &TableLoad> {
        self.tables.iter().filter(|t| t.is_loaded())
    }

    pub fn failed(&self) -> impl Iterator<Item = &TableLoad> {
        self.tables.iter().filter(|t| !t.is_loaded())
    }

    /// Whether every table loaded
    pub fn is_complete(&self) -> bool {
        self.failed().next().is_none()
    }
}

/// Loads the dataset from a directory of `<Table>.csv` files
pub struct BulkLoader {
    store: SharedStore,
    registry: SchemaRegistry,
    data_dir: PathBuf,
    metrics: Arc<MetricsRegistry>,
}

impl BulkLoader {
    pub fn new(
        store: SharedStore,
        registry: SchemaRegistry,
        data_dir: impl Into<PathBuf>,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        Self {
            store,
            registry,
            data_dir: data_dir.into(),
            metrics,
        }
    }

    /// Source path for a table
    pub fn source_path(&self, table: &TableDescriptor) -> PathBuf {
        self.data_dir.join(format!("{}.csv", table.name))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Loads every business table, tolerating per-table failures
    pub fn load_all(&self) -> LoadReport {
        let timer = Timer::new();
        let tables: Vec<TableLoad> = self
            .registry
            .business_tables()
            .map(|table| self.load_logged(table))
            .collect();
        let report = LoadReport { tables };

        Logger::info(
            Event::DatasetLoaded,
            &[
                ("elapsed_ms", timer.elapsed_ms_string().as_str()),
                ("failed", report.failed().count().to_string().as_str()),
                ("loaded", report.loaded().count().to_string().as_str()),
                ("rows", report.rows_loaded().to_string().as_str()),
            ],
        );
        report
    }

    fn load_logged(&self, table: &'static TableDescriptor) -> TableLoad {
        let timer = Timer::new();
        match self.load_table(table) {
            Ok(rows) => {
                self.metrics.add_rows_loaded(rows as u64);
                Logger::info(
                    Event::TableLoaded,
                    &[
                        ("elapsed_ms", timer.elapsed_ms_string().as_str()),
                        ("rows", rows.to_string().as_str()),
                        ("table", table.name),
                    ],
                );
                TableLoad {
                    table: table.name,
                    rows: Some(rows),
                    error: None,
                }
            }
            Err(err) => {
                self.metrics.increment_tables_failed();
                Logger::warn(
                    Event::TableLoadFailed,
                    &[
                        ("code", err.code().code()),
                        ("reason", err.message()),
                        ("table", table.name),
                    ],
                );
                TableLoad {
                    table: table.name,
                    rows: None,
                    error: Some(err.to_string()),
                }
            }
        }
    }

    /// Clears and reloads one table, returning rows inserted
    pub fn load_table(&self, table: &'static TableDescriptor) -> LoadResult<usize> {
        let mut source = CsvSource::open(&self.source_path(table), table)?;
        let columns = source.column_names();
        let chunk_rows = (MAX_PARAMS_PER_STATEMENT / columns.len().max(1)).max(1);

        self.store
            .execute(&format!("DELETE FROM {}", quote_ident(table.name)), &[])?;

        let mut total = 0;
        loop {
            let chunk = source.next_chunk(chunk_rows)?;
            if chunk.is_empty() {
                break;
            }
            total += self.store.insert(table.name, &columns, &chunk)?;
        }
        Ok(total)
    }
}
