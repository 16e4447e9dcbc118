//! Per-session usage statistics over the audit log
//!
//! Both operations are pure reads: no cursor or cache survives between
//! calls, so they can be repeated at any time.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::executor::{ExecutorError, ExecutorResult, Row, SharedStore, StoreValue};
use crate::schema::ddl::quote_ident;
use crate::schema::RESPONSE_LOGS;

const SELECT_MARKER: &str = "SELECT";
const WHERE_MARKER: &str = "WHERE";
const LEFT_JOIN_MARKER: &str = "LEFT JOIN";

/// Derived statistics for one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageStatistics {
    /// Audit records in the session
    pub query_count: u64,
    /// Sum of rows returned across records
    pub result_count: i64,
    /// Records whose text contains `SELECT`
    pub select_count: u64,
    /// ... of which also contain `WHERE`
    pub select_where_count: u64,
    /// ... of which also contain `LEFT JOIN`
    pub select_left_join_count: u64,
}

impl UsageStatistics {
    /// Folds one logged statement into the totals.
    ///
    /// Markers are matched case-sensitively.
    pub fn add(&mut self, query: &str, rows_returned: i64) {
        self.query_count += 1;
        self.result_count += rows_returned;
        if query.contains(SELECT_MARKER) {
            self.select_count += 1;
            if query.contains(WHERE_MARKER) {
                self.select_where_count += 1;
            }
            if query.contains(LEFT_JOIN_MARKER) {
                self.select_left_join_count += 1;
            }
        }
    }

    /// Totals over a sequence of `(query, rows_returned)`
    pub fn tally<'a>(entries: impl IntoIterator<Item = (&'a str, i64)>) -> Self {
        entries
            .into_iter()
            .fold(Self::default(), |mut stats, (query, rows)| {
                stats.add(query, rows);
                stats
            })
    }
}

/// One chronological audit entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "queriedAt", default)]
    pub queried_at: Option<String>,
    #[serde(rename = "Query", default)]
    pub query: Option<String>,
    #[serde(rename = "RowsReturned", default)]
    pub rows_returned: Option<i64>,
    #[serde(rename = "ResponseTime", default)]
    pub response_time: Option<f64>,
}

/// Reads a session's audit records
#[derive(Clone)]
pub struct UsageAggregator {
    store: SharedStore,
}

impl UsageAggregator {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Statistics for `session_id`
    pub fn stats(&self, session_id: &str) -> ExecutorResult<UsageStatistics> {
        let history = self.history(session_id)?;
        Ok(UsageStatistics::tally(history.iter().map(|e| {
            (
                e.query.as_deref().unwrap_or_default(),
                e.rows_returned.unwrap_or_default(),
            )
        })))
    }

    /// Every record for `session_id`, in insertion order
    pub fn history(&self, session_id: &str) -> ExecutorResult<Vec<HistoryEntry>> {
        let sql = format!(
            "SELECT {}, {}, {}, {} FROM {} WHERE {} = ? ORDER BY rowid",
            quote_ident("queriedAt"),
            quote_ident("Query"),
            quote_ident("RowsReturned"),
            quote_ident("ResponseTime"),
            quote_ident(RESPONSE_LOGS),
            quote_ident("SessionID"),
        );
        self.store
            .query(&sql, &[StoreValue::Text(session_id.to_string())])?
            .into_iter()
            .map(to_entry)
            .collect()
    }
}

fn to_entry(row: Row) -> ExecutorResult<HistoryEntry> {
    serde_json::from_value(Value::Object(row))
        .map_err(|e| ExecutorError::query_rejected(format!("Malformed audit record: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{SqliteStore, Store};
    use crate::observability::{AuditLogger, AuditRecord, MetricsRegistry};
    use crate::schema::{ddl, SchemaRegistry};
    use std::sync::Arc;

    #[test]
    fn test_tally_classifies_markers() {
        let stats = UsageStatistics::tally([
            ("SELECT * FROM \"Products\" LIMIT 2", 2),
            ("SELECT COUNT(1) AS \"total\" FROM \"Products\"", 77),
            ("SELECT * FROM \"Products\" WHERE \"ProductID\" = 3", 1),
            ("SELECT o.\"OrderID\" FROM \"Orders\" AS o LEFT JOIN \"OrderDetails\" AS od ON 1", 5),
            ("select lowercase where", 0),
        ]);
        assert_eq!(stats.query_count, 5);
        assert_eq!(stats.result_count, 85);
        assert_eq!(stats.select_count, 4);
        assert_eq!(stats.select_where_count, 1);
        assert_eq!(stats.select_left_join_count, 1);
    }

    #[test]
    fn test_empty_session_is_all_zero() {
        assert_eq!(
            UsageStatistics::tally(Vec::<(&str, i64)>::new()),
            UsageStatistics::default()
        );
    }

    #[test]
    fn test_counters_are_ordered() {
        let stats = UsageStatistics::tally([
            ("WHERE only", 1),
            ("LEFT JOIN only", 1),
            ("SELECT x WHERE y LEFT JOIN z", 1),
        ]);
        assert!(stats.select_where_count <= stats.select_count);
        assert!(stats.select_left_join_count <= stats.select_count);
        assert!(stats.select_count <= stats.query_count);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(UsageStatistics::default()).unwrap();
        for key in [
            "queryCount",
            "resultCount",
            "selectCount",
            "selectWhereCount",
            "selectLeftJoinCount",
        ] {
            assert!(json.get(key).is_some(), "{}", key);
        }
    }

    #[test]
    fn test_history_is_chronological_and_per_session() {
        let store = SqliteStore::open_in_memory().unwrap();
        let table = SchemaRegistry::northwind().describe(RESPONSE_LOGS).unwrap();
        store.execute(&ddl::create_table(table), &[]).unwrap();
        let store: SharedStore = Arc::new(store);

        let audit = AuditLogger::new(store.clone(), Arc::new(MetricsRegistry::new()));
        audit.record(AuditRecord::new("a", "ip", "SELECT 1").with_rows(1));
        audit.record(AuditRecord::new("b", "ip", "SELECT 2").with_rows(9));
        audit.record(AuditRecord::new("a", "ip", "SELECT 3 WHERE x").with_rows(4));

        let usage = UsageAggregator::new(store);
        let history = usage.history("a").unwrap();
        let queries: Vec<_> = history.iter().filter_map(|e| e.query.as_deref()).collect();
        assert_eq!(queries, ["SELECT 1", "SELECT 3 WHERE x"]);

        let stats = usage.stats("a").unwrap();
        assert_eq!(stats.query_count, 2);
        assert_eq!(stats.result_count, 5);
        assert_eq!(stats.select_where_count, 1);

        // Repeatable
        assert_eq!(usage.stats("a").unwrap(), stats);
        assert!(usage.history("missing").unwrap().is_empty());
    }
}
