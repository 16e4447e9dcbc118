//! Worker-data lookup errors

use thiserror::Error;

pub type GeoResult<T> = Result<T, GeoError>;

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("No caller IP address available")]
    MissingIp,

    #[error("Not an IP address: {0}")]
    InvalidIp(String),

    #[error("{service} request failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned HTTP {status}")]
    Status {
        service: &'static str,
        status: u16,
    },

    #[error("{service} refused the lookup: {message}")]
    Refused {
        service: &'static str,
        message: String,
    },

    #[error("{service} response is missing '{field}'")]
    MissingField {
        service: &'static str,
        field: &'static str,
    },

    #[error("No airport found near {lat},{lon}")]
    NoAirport { lat: f64, lon: f64 },

    #[error("HTTP client setup failed: {0}")]
    Client(#[source] reqwest::Error),
}

impl GeoError {
    /// Short machine-readable code for logs
    pub fn code(&self) -> &'static str {
        match self {
            GeoError::MissingIp => "NW_GEO_MISSING_IP",
            GeoError::InvalidIp(_) => "NW_GEO_INVALID_IP",
            GeoError::Transport { .. } => "NW_GEO_TRANSPORT",
            GeoError::Status { .. } => "NW_GEO_STATUS",
            GeoError::Refused { .. } => "NW_GEO_REFUSED",
            GeoError::MissingField { .. } => "NW_GEO_MISSING_FIELD",
            GeoError::NoAirport { .. } => "NW_GEO_NO_AIRPORT",
            GeoError::Client(_) => "NW_GEO_CLIENT",
        }
    }
}
