//! Query executor for northwind
//!
//! Runs a resolved statement as a single read against the store. For
//! unbounded pages with an offset the store steps past the skipped rows,
//! since no `LIMIT` literal is ever sent to the engine.

use std::sync::Arc;

use serde_json::Value;

use crate::planner::{QueryResolver, ResolvedQuery};

use super::errors::{ExecutorError, ExecutorResult};
use super::result::ExecutionResult;
use super::store::{Store, StoreValue};

/// Shared store handle
pub type SharedStore = Arc<dyn Store>;

/// Executes resolved queries against a shared store
#[derive(Clone)]
pub struct QueryExecutor {
    store: SharedStore,
    resolver: Arc<QueryResolver>,
}

impl QueryExecutor {
    /// Creates a new executor
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            resolver: Arc::new(QueryResolver::default()),
        }
    }

    /// Returns the underlying store
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Executes a resolved query and returns its rows
    pub fn execute(&self, query: &ResolvedQuery) -> ExecutorResult<ExecutionResult> {
        let params: Vec<StoreValue> = query.params.iter().map(StoreValue::from).collect();
        let rows = self.store.query_from(&query.sql, &params, query.skip)?;
        Ok(ExecutionResult::new(rows))
    }

    /// Executes a count query and returns its single scalar
    pub fn execute_count(&self, query: &ResolvedQuery) -> ExecutorResult<i64> {
        let result = self.execute(query)?;
        let row = result
            .rows
            .first()
            .ok_or_else(|| ExecutorError::query_rejected("Count query returned no rows"))?;

        match row.get("total").or_else(|| row.values().next()) {
            Some(Value::Number(n)) => n
                .as_i64()
                .ok_or_else(|| ExecutorError::query_rejected("Count is not an integer")),
            _ => Err(ExecutorError::query_rejected("Count query returned no scalar")),
        }
    }

    /// Counts every row of `table` through the resolver's count statement
    pub fn execute_scalar_count(&self, table: &str) -> ExecutorResult<i64> {
        let query = self
            .resolver
            .resolve_count(table)
            .map_err(|e| ExecutorError::query_rejected(e.message()))?;
        self.execute_count(&query)
    }
}
