//! Application services shared by the UI models.
//!
//! `AppServices` holds the tokio runtime handle and the API clients. Each
//! request task takes its own `Arc` of the client it needs.

use std::sync::Arc;
use std::time::Duration;

use meteo_core::{AppError, Config, ConfigError};
use meteo_weather::{ForecastClient, GeocodingClient};

use crate::error_mapping::from_weather_error;

pub struct AppServices {
    /// Handle of the runtime that runs every request
    runtime: tokio::runtime::Handle,

    /// Geocoding search client
    geocoding: Arc<GeocodingClient>,

    /// Forecast client
    forecast: Arc<ForecastClient>,
}

impl AppServices {
    /// Build the services from a configuration.
    ///
    /// Fails with `ConfigError::Invalid` if the configuration does not
    /// validate.
    pub fn new(config: &Config, runtime: tokio::runtime::Handle) -> Result<Self, AppError> {
        let (geocoding, forecast) = build_clients(config)?;
        tracing::info!(
            geocoding_url = %config.api.geocoding_url,
            forecast_url = %config.api.forecast_url,
            "AppServices initialized"
        );

        Ok(Self {
            runtime,
            geocoding: Arc::new(geocoding),
            forecast: Arc::new(forecast),
        })
    }

    /// Get the tokio runtime handle.
    pub fn runtime(&self) -> tokio::runtime::Handle {
        self.runtime.clone()
    }

    pub fn geocoding(&self) -> Arc<GeocodingClient> {
        Arc::clone(&self.geocoding)
    }

    pub fn forecast(&self) -> Arc<ForecastClient> {
        Arc::clone(&self.forecast)
    }
}

fn build_clients(config: &Config) -> Result<(GeocodingClient, ForecastClient), AppError> {
    let validation = config.validate();
    if !validation.is_valid() {
        return Err(ConfigError::Invalid(validation.error_summary()).into());
    }
    for warning in &validation.warnings {
        tracing::warn!("Config warning: {}", warning);
    }

    let timeout = config.api.request_timeout_secs.map(Duration::from_secs);

    let geocoding = GeocodingClient::new(&config.api.geocoding_url, timeout)
        .map_err(from_weather_error)?
        .with_language(&config.api.language)
        .with_result_limit(config.search.result_limit)
        .with_fallback_cities(config.search.fallback_cities.clone());

    let forecast = ForecastClient::new(&config.api.forecast_url, timeout)
        .map_err(from_weather_error)?
        .with_forecast_days(config.forecast.forecast_days);

    Ok((geocoding, forecast))
}
