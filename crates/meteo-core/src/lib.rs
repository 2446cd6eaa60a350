pub mod config;
pub mod error;
pub mod load_state;

pub use config::{ApiConfig, Config, ForecastConfig, SearchConfig, ValidationResult};
pub use error::{AppError, ConfigError, NetworkError, ReqwestErrorExt, WeatherError};
pub use load_state::LoadState;

use anyhow::Result;

/// Initialize the core application
pub fn init() -> Result<()> {
    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::info!("Meteo core initialized");
    Ok(())
}
