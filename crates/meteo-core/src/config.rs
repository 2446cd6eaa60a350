use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use meteo_weather::{geocode, provider};
use url::Url;

use crate::error::{AppError, ConfigError};

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Upstream endpoints and request settings
    #[serde(default)]
    pub api: ApiConfig,

    /// City search settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Forecast settings
    #[serde(default)]
    pub forecast: ForecastConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Open-Meteo geocoding search endpoint
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,

    /// Open-Meteo forecast endpoint
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,

    /// Language for place names returned by the geocoder
    #[serde(default = "default_language")]
    pub language: String,

    /// Request timeout in seconds.
    ///
    /// Unset means the HTTP client's own defaults apply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

fn default_geocoding_url() -> String {
    geocode::GEOCODING_URL.to_string()
}

fn default_forecast_url() -> String {
    provider::FORECAST_URL.to_string()
}

fn default_language() -> String {
    geocode::DEFAULT_LANGUAGE.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            geocoding_url: default_geocoding_url(),
            forecast_url: default_forecast_url(),
            language: default_language(),
            request_timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of candidates requested for a free-text search (default: 10)
    #[serde(default = "default_result_limit")]
    pub result_limit: u32,

    /// Cities shown when the search box is empty, in display order
    #[serde(default = "default_fallback_cities")]
    pub fallback_cities: Vec<String>,
}

fn default_result_limit() -> u32 {
    geocode::DEFAULT_RESULT_LIMIT
}

fn default_fallback_cities() -> Vec<String> {
    geocode::DEFAULT_FALLBACK_CITIES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            result_limit: default_result_limit(),
            fallback_cities: default_fallback_cities(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Number of forecast days (1-16). Unset lets the API pick its default horizon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast_days: Option<u8>,
}

impl Config {
    /// Load configuration from the default location, creating it if it doesn't exist
    pub fn load() -> Result<Self, AppError> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific file, creating a default one if missing
    pub fn load_from(config_path: &Path) -> Result<Self, AppError> {
        if !config_path.exists() {
            tracing::info!("Creating default config at {}", config_path.display());
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(config_path)?;

        toml::from_str(&contents).map_err(|e| {
            ConfigError::ParseError(format!("{}: {}", config_path.display(), e)).into()
        })
    }

    /// Load configuration and validate it
    ///
    /// With an explicit path the file must exist; only the default location
    /// is created on first use. Returns the config along with any validation
    /// warnings, or an error if validation fails.
    pub fn load_validated(
        config_path: Option<&Path>,
    ) -> Result<(Self, ValidationResult), AppError> {
        let config = match config_path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.display().to_string()).into());
            }
            Some(path) => Self::load_from(path)?,
            None => Self::load()?,
        };
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        validate_url(&self.api.geocoding_url, "api.geocoding_url", &mut result);
        validate_url(&self.api.forecast_url, "api.forecast_url", &mut result);

        if self.api.language.trim().is_empty() {
            result.add_error("api.language", "Language must not be empty");
        }

        if self.api.request_timeout_secs == Some(0) {
            result.add_error(
                "api.request_timeout_secs",
                "Timeout must be greater than 0 (remove it to use the client default)",
            );
        }

        if !(1..=100).contains(&self.search.result_limit) {
            result.add_error(
                "search.result_limit",
                "Result limit must be between 1 and 100",
            );
        }

        if self.search.fallback_cities.is_empty() {
            result.add_warning(
                "search.fallback_cities",
                "No fallback cities - an empty search will show nothing",
            );
        } else if self
            .search
            .fallback_cities
            .iter()
            .any(|name| name.trim().is_empty())
        {
            result.add_error(
                "search.fallback_cities",
                "Fallback city names must not be blank",
            );
        }

        if let Some(days) = self.forecast.forecast_days {
            if !(1..=16).contains(&days) {
                result.add_error(
                    "forecast.forecast_days",
                    "Forecast days must be between 1 and 16",
                );
            }
        }

        result
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<(), AppError> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, config_path: &Path) -> Result<(), AppError> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, contents)?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf, AppError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::NotFound("no user config directory".to_string()))?
            .join("meteo");

        Ok(config_dir.join("config.toml"))
    }
}

/// Validate a URL field
fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
    match Url::parse(url_str) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                result.add_error(
                    field_name,
                    format!("URL must use http or https scheme, got: {}", url.scheme()),
                );
            }

            if url.host().is_none() {
                result.add_error(field_name, "URL must have a host");
            }

            if url.port() == Some(0) {
                result.add_error(field_name, "Port cannot be 0");
            }
        }
        Err(e) => {
            result.add_error(field_name, format!("Invalid URL: {}", e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_default_fallback_cities() {
        let config = Config::default();
        assert_eq!(config.search.fallback_cities.len(), 7);
        assert_eq!(config.search.fallback_cities[0], "Paris");
        assert_eq!(config.search.fallback_cities[6], "Bordeaux");
        assert_eq!(config.search.result_limit, 10);
        assert_eq!(config.api.language, "fr");
        assert!(config.api.request_timeout_secs.is_none());
    }

    #[test]
    fn test_invalid_url() {
        let mut config = Config::default();
        config.api.geocoding_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "api.geocoding_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.api.forecast_url = "ftp://localhost:8080".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_result_limit_bounds() {
        let mut config = Config::default();
        config.search.result_limit = 0;
        assert!(!config.validate().is_valid());

        config.search.result_limit = 101;
        assert!(!config.validate().is_valid());

        config.search.result_limit = 100;
        assert!(config.validate().is_valid());
    }

    #[test]
    fn test_empty_fallback_list_is_warning() {
        let mut config = Config::default();
        config.search.fallback_cities.clear();
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "search.fallback_cities"));
    }

    #[test]
    fn test_forecast_days_out_of_range() {
        let mut config = Config::default();
        config.forecast.forecast_days = Some(17);
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "forecast.forecast_days"));
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }

    #[test]
    fn test_load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.search.result_limit, 10);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[api]\nlanguage = \"en\"\n\n[search]\nresult_limit = 5\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api.language, "en");
        assert_eq!(config.api.forecast_url, default_forecast_url());
        assert_eq!(config.search.result_limit, 5);
        assert_eq!(config.search.fallback_cities.len(), 7);
    }

    #[test]
    fn test_load_validated_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[search]\nresult_limit = 0\n").unwrap();

        let err = Config::load_validated(Some(&path)).unwrap_err();
        assert!(matches!(err, AppError::Config(ConfigError::Invalid(_))));
        assert!(err.to_string().contains("search.result_limit"));
    }

    #[test]
    fn test_load_validated_explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let err = Config::load_validated(Some(&path)).unwrap_err();
        assert!(matches!(err, AppError::Config(ConfigError::NotFound(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[search\nresult_limit = \"ten\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, AppError::Config(ConfigError::ParseError(_))));
        assert_eq!(
            err.user_message(),
            "Configuration file is malformed. Check your settings."
        );
    }

    #[test]
    fn test_unreadable_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();

        // A directory exists but cannot be read as a file
        let err = Config::load_from(dir.path()).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.forecast.forecast_days = Some(10);
        config.api.request_timeout_secs = Some(20);
        config.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.forecast.forecast_days, Some(10));
        assert_eq!(reloaded.api.request_timeout_secs, Some(20));
    }
}
