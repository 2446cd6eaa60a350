use std::time::Duration;

use reqwest::Client;
use tracing::instrument;
use url::Url;

use crate::decode;
use crate::types::{WeatherData, WeatherError};

pub const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Variables requested for current conditions
pub const CURRENT_FIELDS: &str = "temperature_2m,weather_code";

/// Variables requested for the daily series
pub const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,\
sunshine_duration,precipitation_sum,rain_sum,precipitation_probability_max,wind_speed_10m_max";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Client for the forecast endpoint
#[derive(Debug, Clone)]
pub struct ForecastClient {
    client: Client,
    base_url: String,
    forecast_days: Option<u8>,
}

impl ForecastClient {
    /// Create a client for `base_url` (usually [`FORECAST_URL`]).
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, WeatherError> {
        Ok(Self {
            client: crate::http_client(timeout)?,
            base_url: base_url.to_string(),
            forecast_days: None,
        })
    }

    /// Ask for a specific horizon instead of the API default.
    pub fn with_forecast_days(mut self, days: Option<u8>) -> Self {
        self.forecast_days = days;
        self
    }

    /// Fetch current conditions and the daily series for a location.
    ///
    /// The payload is decoded as a whole: a missing field or malformed date
    /// fails the fetch. The cause is logged and kept as the error source.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherData, WeatherError> {
        let url = self.forecast_url(latitude, longitude)?;

        match self.fetch(url).await {
            Ok(data) => {
                if !data.daily.is_aligned() {
                    tracing::warn!(
                        "Daily series misaligned (horizon {} days), skipping incomplete days",
                        data.daily.horizon()
                    );
                }
                Ok(data)
            }
            Err(e) => {
                tracing::error!("Error fetching city weather: {}", e);
                Err(WeatherError::fetch_failed("Failed to fetch weather data", e))
            }
        }
    }

    async fn fetch(&self, url: Url) -> Result<WeatherData, BoxError> {
        tracing::debug!(url = %url, "Fetching forecast");

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {status}").into());
        }

        let body = response.bytes().await?;
        Ok(decode::strict(&body)?)
    }

    fn forecast_url(&self, latitude: f64, longitude: f64) -> Result<Url, WeatherError> {
        validate_coordinates(latitude, longitude)?;

        let latitude = latitude.to_string();
        let longitude = longitude.to_string();
        let mut params = vec![
            ("latitude", latitude),
            ("longitude", longitude),
            ("current", CURRENT_FIELDS.to_string()),
            ("daily", DAILY_FIELDS.to_string()),
            ("format", "json".to_string()),
        ];
        if let Some(days) = self.forecast_days {
            params.push(("forecast_days", days.to_string()));
        }

        Url::parse_with_params(&self.base_url, &params)
            .map_err(|e| WeatherError::InvalidUrl(format!("{}: {}", self.base_url, e)))
    }
}

fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), WeatherError> {
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(WeatherError::InvalidUrl(format!(
            "coordinates out of range: {latitude}, {longitude}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_value(url: &Url, key: &str) -> Option<String> {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn test_forecast_url() {
        let client = ForecastClient::new(FORECAST_URL, None).unwrap();
        let url = client.forecast_url(48.8566, 2.3522).unwrap();

        assert_eq!(url.host_str(), Some("api.open-meteo.com"));
        assert_eq!(query_value(&url, "latitude").as_deref(), Some("48.8566"));
        assert_eq!(query_value(&url, "longitude").as_deref(), Some("2.3522"));
        assert_eq!(
            query_value(&url, "current").as_deref(),
            Some("temperature_2m,weather_code")
        );
        assert_eq!(query_value(&url, "daily").as_deref(), Some(DAILY_FIELDS));
        assert_eq!(query_value(&url, "format").as_deref(), Some("json"));
        assert!(query_value(&url, "forecast_days").is_none());
    }

    #[test]
    fn test_forecast_url_with_days() {
        let client = ForecastClient::new(FORECAST_URL, None)
            .unwrap()
            .with_forecast_days(Some(10));
        let url = client.forecast_url(0.0, 0.0).unwrap();
        assert_eq!(query_value(&url, "forecast_days").as_deref(), Some("10"));
    }

    #[test]
    fn test_daily_fields_list() {
        let fields: Vec<&str> = DAILY_FIELDS.split(',').collect();
        assert_eq!(fields.len(), 8);
        assert!(fields.contains(&"sunshine_duration"));
        assert!(fields.contains(&"wind_speed_10m_max"));
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(0.0, 0.0).is_ok());
        assert!(validate_coordinates(90.0, 180.0).is_ok());
        assert!(validate_coordinates(-90.0, -180.0).is_ok());
        assert!(validate_coordinates(91.0, 0.0).is_err());
        assert!(validate_coordinates(0.0, -181.0).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
        assert!(validate_coordinates(0.0, f64::INFINITY).is_err());
    }

    #[tokio::test]
    async fn test_invalid_coordinates_never_hit_network() {
        let client = ForecastClient::new("http://127.0.0.1:9", None).unwrap();
        let err = client.fetch_forecast(120.0, 0.0).await.unwrap_err();
        assert!(matches!(err, WeatherError::InvalidUrl(_)));
    }
}
