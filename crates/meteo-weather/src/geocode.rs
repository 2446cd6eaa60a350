//! Forward geocoding: turn a place name into candidate cities.
//! Uses the Open-Meteo geocoding API - free, no API key required.

use std::collections::HashSet;
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::instrument;
use url::Url;

use crate::decode;
use crate::types::{City, WeatherError};

pub const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const DEFAULT_LANGUAGE: &str = "fr";
pub const DEFAULT_RESULT_LIMIT: u32 = 10;

/// Well-known cities listed when the query is empty, in display order.
pub const DEFAULT_FALLBACK_CITIES: [&str; 7] = [
    "Paris",
    "New York",
    "Barcelone",
    "Rome",
    "Berlin",
    "Marseille",
    "Bordeaux",
];

/// Client for the geocoding search endpoint
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    client: Client,
    base_url: String,
    language: String,
    result_limit: u32,
    fallback_cities: Vec<String>,
}

impl GeocodingClient {
    /// Create a client for `base_url` (usually [`GEOCODING_URL`]).
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, WeatherError> {
        Ok(Self {
            client: crate::http_client(timeout)?,
            base_url: base_url.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            result_limit: DEFAULT_RESULT_LIMIT,
            fallback_cities: DEFAULT_FALLBACK_CITIES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        })
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }

    pub fn with_result_limit(mut self, result_limit: u32) -> Self {
        self.result_limit = result_limit;
        self
    }

    /// Cities listed, in order, when the query is empty.
    pub fn with_fallback_cities(mut self, names: Vec<String>) -> Self {
        self.fallback_cities = names;
        self
    }

    pub fn fallback_cities(&self) -> &[String] {
        &self.fallback_cities
    }

    /// Search cities by name.
    ///
    /// An empty (or blank) query returns the top match of every fallback city
    /// instead; that path fails as a whole if any single lookup fails. A real
    /// query keeps every result that decodes and drops the rest.
    #[instrument(skip(self), level = "info")]
    pub async fn search(&self, query: &str) -> Result<Vec<City>, WeatherError> {
        let query = query.trim();
        if query.is_empty() {
            return self.search_fallback().await;
        }

        let url = self.search_url(query, self.result_limit)?;
        let results = self.fetch_results(url).await?;
        let received = results.len();

        let cities = dedupe_by_id(decode::lenient::<City>(results));
        if cities.len() < received {
            tracing::info!(
                "Kept {} of {} results for '{}'",
                cities.len(),
                received,
                query
            );
        }
        Ok(cities)
    }

    async fn search_fallback(&self) -> Result<Vec<City>, WeatherError> {
        let mut all_cities = Vec::with_capacity(self.fallback_cities.len());

        for name in &self.fallback_cities {
            let cities = self.top_match(name).await.map_err(|e| {
                tracing::error!("Error fetching default city '{}': {}", name, e);
                WeatherError::fetch_failed(format!("Failed to load default city '{name}'"), e)
            })?;
            all_cities.extend(cities);
        }

        Ok(all_cities)
    }

    async fn top_match(&self, name: &str) -> Result<Vec<City>, WeatherError> {
        let url = self.search_url(name, 1)?;
        let results = self.fetch_results(url).await?;
        decode::strict_items(results)
    }

    fn search_url(&self, name: &str, count: u32) -> Result<Url, WeatherError> {
        let count = count.to_string();
        Url::parse_with_params(
            &self.base_url,
            &[
                ("name", name),
                ("count", count.as_str()),
                ("language", self.language.as_str()),
                ("format", "json"),
            ],
        )
        .map_err(|e| WeatherError::InvalidUrl(format!("{}: {}", self.base_url, e)))
    }

    async fn fetch_results(&self, url: Url) -> Result<Vec<Value>, WeatherError> {
        tracing::debug!(url = %url, "Geocoding request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| WeatherError::fetch_failed("Geocoding request failed", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::fetch_failed(
                "Geocoding request failed",
                format!("HTTP {status}"),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| WeatherError::fetch_failed("Failed to read geocoding response", e))?;

        decode::results_envelope(&body)
    }
}

/// Drop repeated ids, keeping the first occurrence and the original order.
fn dedupe_by_id(cities: Vec<City>) -> Vec<City> {
    let mut seen = HashSet::with_capacity(cities.len());
    cities.into_iter().filter(|city| seen.insert(city.id)).collect()
}
