//! Weather and city search for Meteo
//!
//! Talks to the Open-Meteo geocoding and forecast APIs, decodes their
//! payloads into typed models, and formats values for display.

pub mod decode;
pub mod geocode;
pub mod provider;
pub mod types;
pub mod units;

pub use geocode::GeocodingClient;
pub use provider::ForecastClient;
pub use types::*;

use std::time::Duration;

const USER_AGENT: &str = "Meteo/0.1.0";

/// Shared HTTP client setup. `None` keeps reqwest's default (no overall timeout).
fn http_client(timeout: Option<Duration>) -> Result<reqwest::Client, WeatherError> {
    let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| WeatherError::fetch_failed("Failed to create HTTP client", e))
}
