//! Query service: the table request pipeline
//!
//! resolve → execute → audit primary → count → audit count → `{count, data}`
//!
//! Both audit records share the session and the request's wall-clock
//! window; each carries the time elapsed since the request started.
//! All operations are synchronous; the HTTP layer runs them on the
//! blocking pool.

use std::sync::Arc;

use crate::executor::{QueryExecutor, SharedStore};
use crate::observability::{
    AuditLogger, AuditRecord, Event, Logger, MetricsRegistry, Timer, UsageAggregator,
};
use crate::planner::{PlannerError, QueryRequest, QueryResolver, RawParams};
use crate::schema::SchemaRegistry;

use super::errors::ApiResult;
use super::request::CallerContext;
use super::response::{ResponseLogsView, TableResponse};

/// Serves table requests and audit-log views over one store
pub struct QueryService {
    resolver: QueryResolver,
    executor: QueryExecutor,
    audit: AuditLogger,
    usage: UsageAggregator,
    metrics: Arc<MetricsRegistry>,
}

impl QueryService {
    pub fn new(store: SharedStore, metrics: Arc<MetricsRegistry>) -> Self {
        Self {
            resolver: QueryResolver::new(SchemaRegistry::northwind()),
            executor: QueryExecutor::new(store.clone()),
            audit: AuditLogger::new(store.clone(), metrics.clone()),
            usage: UsageAggregator::new(store),
            metrics,
        }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        self.resolver.registry()
    }

    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    /// Serves the table exposed under `route`
    pub fn serve_route(
        &self,
        route: &str,
        params: &RawParams<'_>,
        caller: &CallerContext,
    ) -> ApiResult<TableResponse> {
        let table = self
            .registry()
            .by_route(route)
            .map_err(PlannerError::from)
            .map_err(|e| self.rejected(e))?;
        self.serve(&QueryRequest::from_params(table.name, params), caller)
    }

    /// Runs one table request end to end
    pub fn serve(&self, request: &QueryRequest, caller: &CallerContext) -> ApiResult<TableResponse> {
        let timer = Timer::new();
        Logger::trace(
            Event::QueryBegin,
            &[
                ("mode", request.mode.as_str()),
                ("session_id", caller.session_id.as_str()),
                ("table", request.table.as_str()),
            ],
        );

        let primary = self.resolver.resolve(request).map_err(|e| self.rejected(e))?;
        let result = self.executor.execute(&primary).map_err(|e| {
            self.metrics.increment_storage_errors();
            e
        })?;
        self.metrics.record_query(result.row_count as u64);
        self.audit.record(
            AuditRecord::new(&caller.session_id, &caller.session_ip, &primary.rendered)
                .with_rows(result.row_count as i64)
                .with_response_time(timer.elapsed_ms()),
        );

        let count_query = self
            .resolver
            .resolve_count(primary.table)
            .map_err(|e| self.rejected(e))?;
        let count = self.executor.execute_count(&count_query).map_err(|e| {
            self.metrics.increment_storage_errors();
            e
        })?;
        self.metrics.record_query(1);
        self.audit.record(
            AuditRecord::new(&caller.session_id, &caller.session_ip, &count_query.rendered)
                .with_rows(count)
                .with_response_time(timer.elapsed_ms()),
        );

        self.metrics.increment_requests_served();
        Logger::trace(
            Event::QueryComplete,
            &[
                ("count", count.to_string().as_str()),
                ("elapsed_ms", timer.elapsed_ms_string().as_str()),
                ("rows", result.row_count.to_string().as_str()),
                ("table", primary.table),
            ],
        );

        Ok(TableResponse {
            count,
            data: result.into_rows(),
        })
    }

    /// Usage statistics plus chronological history for a session
    pub fn response_logs(&self, session_id: &str) -> ApiResult<ResponseLogsView> {
        Ok(ResponseLogsView {
            stats: self.usage.stats(session_id)?,
            history: self.usage.history(session_id)?,
        })
    }

    fn rejected(&self, err: PlannerError) -> PlannerError {
        self.metrics.increment_resolution_errors();
        err
    }
}
