//! Caller country and nearest airport lookup
//!
//! Two chained external calls: IP geolocation, then an airport search at
//! the resulting coordinates. Any failure in the first call aborts the
//! second.

use std::net::IpAddr;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::config::GeoConfig;
use super::errors::{GeoError, GeoResult};

const IP_SERVICE: &str = "ip lookup";
const AIRPORT_SERVICE: &str = "airport lookup";

/// Caller's country and nearest airport
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerData {
    pub country_code: String,
    pub iata: String,
}

/// Coordinates resolved for an address
#[derive(Debug, Clone, PartialEq)]
pub struct IpLocation {
    pub country_code: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IpApiDto {
    status: Option<String>,
    message: Option<String>,
    country_code: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

#[derive(Deserialize)]
struct StationListDto {
    #[serde(default)]
    data: Vec<StationDto>,
}

#[derive(Deserialize)]
struct StationDto {
    iata: Option<String>,
}

/// Reqwest-backed lookup client
pub struct GeoClient {
    client: Client,
    config: GeoConfig,
}

impl GeoClient {
    pub fn new(config: GeoConfig) -> GeoResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(GeoError::Client)?;
        Ok(Self { client, config })
    }

    /// Resolves country and nearest airport for `ip`
    pub async fn worker_data(&self, ip: Option<&str>) -> GeoResult<WorkerData> {
        let ip = normalize_ip(ip)?;
        let location = self.locate(ip).await?;
        let iata = self.nearest_airport(location.lat, location.lon).await?;
        Ok(WorkerData {
            country_code: location.country_code,
            iata,
        })
    }

    /// IP geolocation
    pub async fn locate(&self, ip: IpAddr) -> GeoResult<IpLocation> {
        let url = format!("{}/{}", self.config.ip_api_url.trim_end_matches('/'), ip);
        let body = fetch(self.client.get(url), IP_SERVICE).await?;
        parse_ip_location(&body)
    }

    /// IATA code of the closest airport to the coordinates
    pub async fn nearest_airport(&self, lat: f64, lon: f64) -> GeoResult<String> {
        let url = format!(
            "{}/station/lat/{}/lon/{}/?filter=A",
            self.config.airport_api_url.trim_end_matches('/'),
            lat,
            lon
        );
        let mut request = self.client.get(url);
        if let Some(key) = &self.config.airport_api_key {
            request = request.header("X-API-Key", key.as_str());
        }
        let body = fetch(request, AIRPORT_SERVICE).await?;
        parse_nearest_airport(&body, lat, lon)
    }
}

async fn fetch(request: reqwest::RequestBuilder, service: &'static str) -> GeoResult<Vec<u8>> {
    let response = request
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await
        .map_err(|source| GeoError::Transport { service, source })?;

    let status = response.status();
    if !status.is_success() {
        return Err(GeoError::Status {
            service,
            status: status.as_u16(),
        });
    }
    let body = response
        .bytes()
        .await
        .map_err(|source| GeoError::Transport { service, source })?;
    Ok(body.to_vec())
}

/// Accepts a bare or IPv4-mapped IPv6 address
pub fn normalize_ip(ip: Option<&str>) -> GeoResult<IpAddr> {
    let raw = ip.map(str::trim).filter(|s| !s.is_empty()).ok_or(GeoError::MissingIp)?;
    let addr: IpAddr = raw
        .parse()
        .map_err(|_| GeoError::InvalidIp(raw.to_string()))?;
    Ok(match addr {
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map(IpAddr::V4).unwrap_or(addr),
        v4 => v4,
    })
}

pub fn parse_ip_location(body: &[u8]) -> GeoResult<IpLocation> {
    let dto: IpApiDto = serde_json::from_slice(body).map_err(|_| GeoError::MissingField {
        service: IP_SERVICE,
        field: "status",
    })?;

    if let Some(status) = dto.status.as_deref() {
        if status != "success" {
            return Err(GeoError::Refused {
                service: IP_SERVICE,
                message: dto.message.unwrap_or_else(|| status.to_string()),
            });
        }
    }

    let missing = |field| GeoError::MissingField {
        service: IP_SERVICE,
        field,
    };
    Ok(IpLocation {
        country_code: dto.country_code.ok_or_else(|| missing("countryCode"))?,
        lat: dto.lat.ok_or_else(|| missing("lat"))?,
        lon: dto.lon.ok_or_else(|| missing("lon"))?,
    })
}

pub fn parse_nearest_airport(body: &[u8], lat: f64, lon: f64) -> GeoResult<String> {
    let dto: StationListDto = serde_json::from_slice(body).map_err(|_| GeoError::MissingField {
        service: AIRPORT_SERVICE,
        field: "data",
    })?;
    dto.data
        .into_iter()
        .next()
        .ok_or(GeoError::NoAirport { lat, lon })?
        .iata
        .filter(|s| !s.is_empty())
        .ok_or(GeoError::MissingField {
            service: AIRPORT_SERVICE,
            field: "iata",
        })
}
