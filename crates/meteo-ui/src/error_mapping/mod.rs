//! Maps service errors to meteo_core::AppError for consistent user-facing messages.

mod weather;

pub use weather::from_weather_error;
