//! # HTTP Server
//!
//! Combines the table, response-log, worker-data and observability routers
//! behind CORS and request tracing.

use std::io;
use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::observability::{Event, Logger};

use super::config::HttpServerConfig;
use super::logs_routes::logs_routes;
use super::observability_routes::observability_routes;
use super::state::AppState;
use super::table_routes::table_routes;
use super::worker_routes::worker_routes;

/// HTTP server for the Northwind query service
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn new(config: HttpServerConfig, state: AppState) -> Self {
        let router = Self::build_router(&config, state);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    pub fn build_router(config: &HttpServerConfig, state: AppState) -> Router {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .merge(table_routes(state.clone()))
            .merge(logs_routes(state.clone()))
            .merge(worker_routes(state.clone()))
            .merge(observability_routes(state))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until Ctrl-C
    pub async fn start(self) -> io::Result<()> {
        let addr = self.config.listen_addr()?;
        let listener = TcpListener::bind(addr).await?;
        let local = listener.local_addr()?.to_string();
        Logger::info(Event::Serving, &[("addr", local.as_str())]);

        axum::serve(
            listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        Logger::info(Event::ShutdownComplete, &[]);
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler; run until the process is killed.
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::api::QueryService;
    use crate::executor::{SqliteStore, Store, StoreValue};
    use crate::geo::{GeoClient, GeoConfig};
    use crate::loader::initialize_schema;
    use crate::observability::MetricsRegistry;
    use crate::schema::SchemaRegistry;

    fn state() -> AppState {
        let store = SqliteStore::open_in_memory().unwrap();
        initialize_schema(&store, &SchemaRegistry::northwind(), false).unwrap();
        let rows: Vec<Vec<StoreValue>> = [(1, "Beverages"), (2, "Condiments")]
            .iter()
            .map(|(id, name)| vec![StoreValue::Integer(*id), StoreValue::Text(name.to_string())])
            .collect();
        store.insert("Categories", &["CategoryID", "CategoryName"], &rows).unwrap();

        let service = QueryService::new(Arc::new(store), Arc::new(MetricsRegistry::new()));
        AppState::new(service, GeoClient::new(GeoConfig::default()).unwrap())
    }

    fn router() -> Router {
        HttpServer::new(HttpServerConfig::default(), state()).router()
    }

    async fn get(router: Router, uri: &str, session: Option<&str>) -> (StatusCode, Value) {
        let mut req = Request::builder().uri(uri);
        if let Some(s) = session {
            req = req.header("session-id", s);
        }
        let response = router.oneshot(req.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[test]
    fn test_server_with_custom_port() {
        let server = HttpServer::new(HttpServerConfig::with_port(8080), state());
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get(router(), "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_table_route_by_id() {
        let (status, body) = get(router(), "/categories?id=2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);
        assert_eq!(body["data"][0]["CategoryName"], "Condiments");
    }

    #[tokio::test]
    async fn test_bad_id_is_generic_500() {
        let (status, body) = get(router(), "/categories?id=abc", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Internal server error"}));
    }

    #[tokio::test]
    async fn test_unrouted_table_is_not_found() {
        let response = router()
            .oneshot(Request::builder().uri("/orderDetails").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_response_logs_follow_session_header() {
        let router = router();
        get(router.clone(), "/categories?limit=1", Some("abc")).await;

        let (status, body) = get(router.clone(), "/responseLogs", Some("abc")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stats"]["queryCount"], 2);
        assert_eq!(body["history"].as_array().unwrap().len(), 2);

        let (_, other) = get(router, "/responseLogs", Some("other")).await;
        assert_eq!(other["stats"]["queryCount"], 0);
    }

    #[tokio::test]
    async fn test_metrics_reflect_requests() {
        let router = router();
        get(router.clone(), "/categories", None).await;
        let (status, body) = get(router, "/metrics", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["requests_served"], 1);
        assert_eq!(body["audit_writes"], 2);
    }

    #[tokio::test]
    async fn test_worker_data_rejects_bad_ip_without_network() {
        let (status, body) = get(router(), "/workerData?ip=not-an-ip", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }
}
