//! Worker-data lookup configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoConfig {
    /// IP geolocation endpoint; the address is appended as a path segment
    #[serde(default = "default_ip_api_url")]
    pub ip_api_url: String,

    /// Airport lookup base URL
    #[serde(default = "default_airport_api_url")]
    pub airport_api_url: String,

    /// Sent as `X-API-Key` to the airport service
    #[serde(default)]
    pub airport_api_key: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_ip_api_url() -> String {
    "http://ip-api.com/json".to_string()
}

fn default_airport_api_url() -> String {
    "https://api.checkwx.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            ip_api_url: default_ip_api_url(),
            airport_api_url: default_airport_api_url(),
            airport_api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}
