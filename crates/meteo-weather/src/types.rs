use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::units::{self, HoursMinutes};

/// Weather condition categories mapped from WMO codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Clear,
    PartlyCloudy,
    Fog,
    Drizzle,
    FreezingDrizzle,
    Rain,
    FreezingRain,
    Snow,
    SnowGrains,
    RainShowers,
    SnowShowers,
    Thunderstorm,
    ThunderstormWithHail,
    #[default]
    Unknown,
}

impl WeatherCondition {
    /// Convert WMO weather code to WeatherCondition
    /// See: https://open-meteo.com/en/docs#weathervariables
    pub fn from_wmo_code(code: i32) -> Self {
        match code {
            0 => Self::Clear,
            1..=3 => Self::PartlyCloudy,
            45 | 48 => Self::Fog,
            51 | 53 | 55 => Self::Drizzle,
            56 | 57 => Self::FreezingDrizzle,
            61 | 63 | 65 => Self::Rain,
            66 | 67 => Self::FreezingRain,
            71 | 73 | 75 => Self::Snow,
            77 => Self::SnowGrains,
            80..=82 => Self::RainShowers,
            85 | 86 => Self::SnowShowers,
            95 => Self::Thunderstorm,
            96 | 99 => Self::ThunderstormWithHail,
            _ => Self::Unknown,
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Fog => "Fog",
            Self::Drizzle => "Drizzle",
            Self::FreezingDrizzle => "Freezing Drizzle",
            Self::Rain => "Rain",
            Self::FreezingRain => "Freezing Rain",
            Self::Snow => "Snow",
            Self::SnowGrains => "Snow Grains",
            Self::RainShowers => "Rain Showers",
            Self::SnowShowers => "Snow Showers",
            Self::Thunderstorm => "Thunderstorm",
            Self::ThunderstormWithHail => "Thunderstorm with Hail",
            Self::Unknown => "Unknown",
        }
    }

    /// Symbol name the view layer resolves to an icon
    pub fn icon_name(&self) -> &'static str {
        match self {
            Self::Clear => "sun.max",
            Self::PartlyCloudy => "cloud.sun",
            Self::Fog => "cloud.fog",
            Self::Drizzle => "cloud.drizzle",
            Self::FreezingDrizzle => "cloud.drizzle.fill",
            Self::Rain => "cloud.rain",
            Self::FreezingRain => "cloud.sleet",
            Self::Snow | Self::SnowShowers => "cloud.snow",
            Self::SnowGrains => "cloud.snow.fill",
            Self::RainShowers => "cloud.sun.rain",
            Self::Thunderstorm => "cloud.bolt",
            Self::ThunderstormWithHail => "cloud.bolt.rain",
            Self::Unknown => "questionmark",
        }
    }
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// A place returned by the geocoding API.
///
/// Identity is `id`; two cities with the same id are the same place even if
/// other fields differ between responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
    pub timezone: String,
    pub population: u64,
    pub postcodes: Vec<String>,
    pub country: String,
    pub country_code: Option<String>,
    pub feature_code: Option<String>,
    pub country_id: Option<i64>,
    pub admin1_id: Option<i64>,
    pub admin3_id: Option<i64>,
    pub admin4_id: Option<i64>,
    pub admin1: Option<String>,
    pub admin3: Option<String>,
    pub admin4: Option<String>,
}

/// Current conditions at the forecast location
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrentWeather {
    #[serde(deserialize_with = "units::serde_dates::instant")]
    pub time: DateTime<Utc>,
    #[serde(rename = "temperature_2m")]
    pub temperature: f64,
    pub weather_code: i32,
}

impl CurrentWeather {
    pub fn condition(&self) -> WeatherCondition {
        WeatherCondition::from_wmo_code(self.weather_code)
    }
}

/// Daily series as sent by the API: parallel arrays, one entry per day.
///
/// The API promises equal lengths but nothing checks it locally, so read
/// through [`DailyForecast::day`] (or `Vec::get`) rather than indexing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DailyForecast {
    #[serde(rename = "time", deserialize_with = "units::serde_dates::daily_dates")]
    pub dates: Vec<NaiveDate>,
    pub weather_code: Vec<i32>,
    #[serde(rename = "temperature_2m_max")]
    pub temperature_max: Vec<f64>,
    #[serde(rename = "temperature_2m_min")]
    pub temperature_min: Vec<f64>,
    /// Seconds of sunshine per day
    pub sunshine_duration: Vec<f64>,
    pub precipitation_sum: Vec<f64>,
    pub rain_sum: Vec<f64>,
    pub precipitation_probability_max: Vec<f64>,
    #[serde(rename = "wind_speed_10m_max")]
    pub wind_speed_max: Vec<f64>,
}

impl DailyForecast {
    /// Forecast horizon in days, as given by the date series.
    pub fn horizon(&self) -> usize {
        self.dates.len()
    }

    /// True when every series has the same length as the date series.
    pub fn is_aligned(&self) -> bool {
        let n = self.dates.len();
        [
            self.weather_code.len(),
            self.temperature_max.len(),
            self.temperature_min.len(),
            self.sunshine_duration.len(),
            self.precipitation_sum.len(),
            self.rain_sum.len(),
            self.precipitation_probability_max.len(),
            self.wind_speed_max.len(),
        ]
        .iter()
        .all(|len| *len == n)
    }

    /// All values for day `index`, or `None` if any series is too short.
    pub fn day(&self, index: usize) -> Option<DayForecast> {
        let weather_code = *self.weather_code.get(index)?;
        Some(DayForecast {
            date: *self.dates.get(index)?,
            weather_code,
            condition: WeatherCondition::from_wmo_code(weather_code),
            temperature_max: *self.temperature_max.get(index)?,
            temperature_min: *self.temperature_min.get(index)?,
            sunshine_duration: *self.sunshine_duration.get(index)?,
            precipitation_sum: *self.precipitation_sum.get(index)?,
            rain_sum: *self.rain_sum.get(index)?,
            precipitation_probability_max: *self.precipitation_probability_max.get(index)?,
            wind_speed_max: *self.wind_speed_max.get(index)?,
        })
    }

    /// Every complete day within the horizon, in date order.
    pub fn days(&self) -> Vec<DayForecast> {
        (0..self.horizon()).filter_map(|i| self.day(i)).collect()
    }
}

/// One day of the daily series, gathered from the parallel arrays
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayForecast {
    pub date: NaiveDate,
    pub weather_code: i32,
    pub condition: WeatherCondition,
    pub temperature_max: f64,
    pub temperature_min: f64,
    pub sunshine_duration: f64,
    pub precipitation_sum: f64,
    pub rain_sum: f64,
    pub precipitation_probability_max: f64,
    pub wind_speed_max: f64,
}

impl DayForecast {
    pub fn sunshine(&self) -> HoursMinutes {
        units::seconds_to_hours_minutes(self.sunshine_duration)
    }
}

/// Complete forecast response
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeatherData {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(rename = "generationtime_ms")]
    pub generation_time_ms: Option<f64>,
    pub utc_offset_seconds: Option<i32>,
    pub timezone: Option<String>,
    pub timezone_abbreviation: Option<String>,
    pub elevation: Option<f64>,
    pub current: CurrentWeather,
    pub daily: DailyForecast,
}

/// Weather and geocoding errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Decoding failed: {0}")]
    DecodingFailed(String),
    #[error("Fetch failed: {context}")]
    FetchFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("Malformed date: {0}")]
    MalformedDate(String),
}

impl WeatherError {
    pub fn fetch_failed(
        context: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::FetchFailed {
            context: context.into(),
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_daily() -> DailyForecast {
        serde_json::from_value(serde_json::json!({
            "time": ["2024-02-05", "2024-02-06", "2024-02-07"],
            "weather_code": [0, 61, 95],
            "temperature_2m_max": [12.4, 10.0, 8.6],
            "temperature_2m_min": [3.1, 4.0, 2.2],
            "sunshine_duration": [3661.0, 0.0, 7200.0],
            "precipitation_sum": [0.0, 4.2, 12.5],
            "rain_sum": [0.0, 4.2, 11.0],
            "precipitation_probability_max": [5, 80, 95],
            "wind_speed_10m_max": [10.3, 22.0, 41.7]
        }))
        .unwrap()
    }

    #[test]
    fn test_wmo_code_clear() {
        assert_eq!(WeatherCondition::from_wmo_code(0), WeatherCondition::Clear);
    }

    #[test]
    fn test_wmo_code_partly_cloudy() {
        for code in 1..=3 {
            assert_eq!(WeatherCondition::from_wmo_code(code), WeatherCondition::PartlyCloudy);
        }
    }

    #[test]
    fn test_wmo_code_precipitation_groups() {
        assert_eq!(WeatherCondition::from_wmo_code(45), WeatherCondition::Fog);
        assert_eq!(WeatherCondition::from_wmo_code(53), WeatherCondition::Drizzle);
        assert_eq!(WeatherCondition::from_wmo_code(57), WeatherCondition::FreezingDrizzle);
        assert_eq!(WeatherCondition::from_wmo_code(63), WeatherCondition::Rain);
        assert_eq!(WeatherCondition::from_wmo_code(66), WeatherCondition::FreezingRain);
        assert_eq!(WeatherCondition::from_wmo_code(75), WeatherCondition::Snow);
        assert_eq!(WeatherCondition::from_wmo_code(77), WeatherCondition::SnowGrains);
        assert_eq!(WeatherCondition::from_wmo_code(81), WeatherCondition::RainShowers);
        assert_eq!(WeatherCondition::from_wmo_code(86), WeatherCondition::SnowShowers);
    }

    #[test]
    fn test_wmo_code_thunderstorm() {
        assert_eq!(WeatherCondition::from_wmo_code(95), WeatherCondition::Thunderstorm);
        assert_eq!(WeatherCondition::from_wmo_code(96), WeatherCondition::ThunderstormWithHail);
        assert_eq!(WeatherCondition::from_wmo_code(99), WeatherCondition::ThunderstormWithHail);
    }

    #[test]
    fn test_wmo_code_unknown() {
        assert_eq!(WeatherCondition::from_wmo_code(4), WeatherCondition::Unknown);
        assert_eq!(WeatherCondition::from_wmo_code(-1), WeatherCondition::Unknown);
        assert_eq!(WeatherCondition::Unknown.icon_name(), "questionmark");
    }

    #[test]
    fn test_condition_icon_name() {
        assert_eq!(WeatherCondition::Clear.icon_name(), "sun.max");
        assert_eq!(WeatherCondition::RainShowers.icon_name(), "cloud.sun.rain");
        assert_eq!(WeatherCondition::Thunderstorm.to_string(), "Thunderstorm");
    }

    #[test]
    fn test_city_optional_fields_may_be_missing() {
        let city: City = serde_json::from_value(serde_json::json!({
            "id": 2988507,
            "name": "Paris",
            "latitude": 48.85341,
            "longitude": 2.3488,
            "elevation": 42.0,
            "timezone": "Europe/Paris",
            "population": 2138551,
            "postcodes": ["75001", "75002"],
            "country": "France"
        }))
        .unwrap();

        assert_eq!(city.id, 2988507);
        assert_eq!(city.postcodes, vec!["75001", "75002"]);
        assert!(city.country_code.is_none());
        assert!(city.admin1.is_none());
    }

    #[test]
    fn test_city_missing_required_field_fails() {
        let result: Result<City, _> = serde_json::from_value(serde_json::json!({
            "id": 1,
            "name": "Nowhere",
            "latitude": 0.0,
            "longitude": 0.0,
            "elevation": 0.0,
            "timezone": "UTC",
            "postcodes": [],
            "country": "None"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_daily_aligned_days() {
        let daily = sample_daily();
        assert!(daily.is_aligned());
        assert_eq!(daily.horizon(), 3);

        let days = daily.days();
        assert_eq!(days.len(), 3);
        assert_eq!(days[1].condition, WeatherCondition::Rain);
        assert_eq!(days[0].sunshine().hours, 1);
        assert_eq!(days[0].sunshine().minutes, 1);
    }

    #[test]
    fn test_daily_short_series_is_bounds_checked() {
        let mut daily = sample_daily();
        daily.rain_sum.pop();

        assert!(!daily.is_aligned());
        assert!(daily.rain_sum.get(2).is_none());
        assert!(daily.day(2).is_none());
        assert!(daily.day(1).is_some());
        assert_eq!(daily.days().len(), 2);
    }

    #[test]
    fn test_daily_rejects_bad_date() {
        let result: Result<DailyForecast, _> = serde_json::from_value(serde_json::json!({
            "time": ["05/02/2024"],
            "weather_code": [0],
            "temperature_2m_max": [1.0],
            "temperature_2m_min": [1.0],
            "sunshine_duration": [1.0],
            "precipitation_sum": [1.0],
            "rain_sum": [1.0],
            "precipitation_probability_max": [1.0],
            "wind_speed_10m_max": [1.0]
        }));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Malformed date"));
    }

    #[test]
    fn test_fetch_failed_keeps_source() {
        use std::error::Error;

        let err = WeatherError::fetch_failed("Failed to fetch weather data", "HTTP 502");
        assert_eq!(err.to_string(), "Fetch failed: Failed to fetch weather data");
        assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("HTTP 502"));
    }
}
