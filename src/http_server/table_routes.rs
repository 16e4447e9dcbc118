//! Table HTTP Routes
//!
//! One `GET /<route>` per routed table. Query parameters select the mode:
//! `id` for get-by-id, else `whereLike` (with optional `whereKey`) for a
//! substring search, else a `limit` / `offset` page.
//!
//! A repeated parameter keeps its first value.

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, MatchedPath, RawQuery, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};

use crate::api::{ApiResult, CallerContext, TableResponse};
use crate::planner::RawParams;

use super::state::{caller_ip, query_params, session_id, AppState};

/// Decoded table query parameters; parsed leniently downstream
#[derive(Debug, Default)]
pub struct TableQuery {
    params: HashMap<String, String>,
}

impl TableQuery {
    pub fn parse(raw: Option<&str>) -> Self {
        Self {
            params: query_params(raw),
        }
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    fn as_raw(&self) -> RawParams<'_> {
        RawParams {
            limit: self.get("limit"),
            offset: self.get("offset"),
            id: self.get("id"),
            where_key: self.get("whereKey"),
            where_like: self.get("whereLike"),
        }
    }
}

/// Create table routes for every routed table in the catalogue
pub fn table_routes(state: AppState) -> Router {
    let router = state
        .service
        .registry()
        .routed_tables()
        .filter_map(|t| t.route)
        .fold(Router::new(), |router, route| {
            router.route(&format!("/{}", route), get(table_handler))
        });
    router.with_state(state)
}

async fn table_handler(
    State(state): State<AppState>,
    path: MatchedPath,
    headers: HeaderMap,
    connect: Option<ConnectInfo<SocketAddr>>,
    RawQuery(raw): RawQuery,
) -> ApiResult<Json<TableResponse>> {
    let route = path.as_str().trim_start_matches('/').to_string();
    let caller = CallerContext::new(session_id(&headers), caller_ip(connect));
    let query = TableQuery::parse(raw.as_deref());

    let service = state.service.clone();
    let response = tokio::task::spawn_blocking(move || {
        service.serve_route(&route, &query.as_raw(), &caller)
    })
    .await??;

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_keys_map_to_raw_params() {
        let query = TableQuery::parse(Some("whereKey=CompanyName&whereLike=Alfre&limit=2&offset=4&id=7"));
        let raw = query.as_raw();
        assert_eq!(raw.where_key, Some("CompanyName"));
        assert_eq!(raw.where_like, Some("Alfre"));
        assert_eq!(raw.limit, Some("2"));
        assert_eq!(raw.offset, Some("4"));
        assert_eq!(raw.id, Some("7"));
    }

    #[test]
    fn test_repeated_key_keeps_first() {
        let query = TableQuery::parse(Some("limit=1&limit=2"));
        assert_eq!(query.as_raw().limit, Some("1"));
    }
}
