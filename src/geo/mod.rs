//! Worker-data helper: caller country and nearest airport
//!
//! Independent of the query pipeline; it shares only the HTTP surface.

mod client;
mod config;
mod errors;

pub use client::{
    normalize_ip, parse_ip_location, parse_nearest_airport, GeoClient, IpLocation, WorkerData,
};
pub use config::GeoConfig;
pub use errors::{GeoError, GeoResult};
