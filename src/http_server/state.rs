//! Shared handler state

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::HeaderMap;
use url::form_urlencoded;

use crate::api::QueryService;
use crate::geo::GeoClient;
use crate::observability::MetricsRegistry;

/// Header carrying the caller's session identifier
pub const SESSION_HEADER: &str = "session-id";

/// State shared by every route
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<QueryService>,
    pub geo: Arc<GeoClient>,
    pub metrics: Arc<MetricsRegistry>,
}

impl AppState {
    pub fn new(service: QueryService, geo: GeoClient) -> Self {
        let metrics = service.metrics().clone();
        Self {
            service: Arc::new(service),
            geo: Arc::new(geo),
            metrics,
        }
    }
}

/// Session header value, if present and valid UTF-8
pub(crate) fn session_id(headers: &HeaderMap) -> Option<&str> {
    headers.get(SESSION_HEADER).and_then(|v| v.to_str().ok())
}

/// Caller address, when the server was started with connect info
pub(crate) fn caller_ip(connect: Option<ConnectInfo<SocketAddr>>) -> String {
    connect
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_default()
}

/// Decodes a query string; the first occurrence of a repeated key wins
pub(crate) fn query_params(raw: Option<&str>) -> HashMap<String, String> {
    let mut params = HashMap::new();
    if let Some(q) = raw {
        for (key, value) in form_urlencoded::parse(q.as_bytes()) {
            params
                .entry(key.into_owned())
                .or_insert_with(|| value.into_owned());
        }
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_session_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_id(&headers), None);
        headers.insert(SESSION_HEADER, HeaderValue::from_static("abc"));
        assert_eq!(session_id(&headers), Some("abc"));
    }

    #[test]
    fn test_caller_ip() {
        assert_eq!(caller_ip(None), "");
        let addr: SocketAddr = "10.1.2.3:5555".parse().unwrap();
        assert_eq!(caller_ip(Some(ConnectInfo(addr))), "10.1.2.3");
    }

    #[test]
    fn test_query_params_first_value_wins() {
        let params = query_params(Some("limit=1&limit=2&whereLike=Chef%20Anton&x"));
        assert_eq!(params["limit"], "1");
        assert_eq!(params["whereLike"], "Chef Anton");
        assert_eq!(params["x"], "");
        assert!(query_params(None).is_empty());
    }
}
