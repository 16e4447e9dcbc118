//! # HTTP Server Module
//!
//! Axum front end for the query service.
//!
//! # Endpoints
//!
//! - `/<table>` - Paged, by-id or substring queries over a catalogue table
//! - `/responseLogs` - Usage statistics and history for a session
//! - `/workerData` - Caller country code and nearest airport
//! - `/health`, `/metrics` - Liveness and process counters
//!
//! Every failure is answered with status 500 and a generic body.

pub mod config;
pub mod logs_routes;
pub mod observability_routes;
pub mod server;
pub mod state;
pub mod table_routes;
pub mod worker_routes;

pub use config::HttpServerConfig;
pub use server::HttpServer;
pub use state::{AppState, SESSION_HEADER};
