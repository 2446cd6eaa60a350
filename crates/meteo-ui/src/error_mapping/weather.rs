use std::error::Error;

use meteo_core::{AppError, ReqwestErrorExt, WeatherError};
use meteo_weather::decode::MISSING_RESULTS;
use meteo_weather::WeatherError as ApiError;

/// Map a client error to the error shown by the UI.
///
/// Transport failures keep their reqwest classification (timeout, connection,
/// status) so the user sees a network message instead of a generic one.
pub fn from_weather_error(e: ApiError) -> AppError {
    match e {
        ApiError::InvalidUrl(s) => AppError::Weather(WeatherError::InvalidRequest(s)),
        ApiError::DecodingFailed(s) if s == MISSING_RESULTS => {
            AppError::Weather(WeatherError::NoResults(s))
        }
        ApiError::DecodingFailed(s) | ApiError::MalformedDate(s) => {
            AppError::Weather(WeatherError::UnexpectedData(s))
        }
        ApiError::FetchFailed { context, source } => from_fetch_source(context, source),
    }
}

fn from_fetch_source(context: String, source: Box<dyn Error + Send + Sync>) -> AppError {
    let source = match source.downcast::<reqwest::Error>() {
        Ok(reqwest_error) => return AppError::Network((*reqwest_error).into_network_error()),
        Err(other) => other,
    };

    // A fallback lookup wraps the request's own FetchFailed; anything else
    // (a decode failure, an HTTP status) stays an opaque fetch failure.
    match source.downcast::<ApiError>() {
        Ok(inner) if matches!(*inner, ApiError::FetchFailed { .. }) => from_weather_error(*inner),
        Ok(inner) => fetch_failed(&context, &inner),
        Err(other) => fetch_failed(&context, &other),
    }
}

fn fetch_failed(context: &str, cause: &dyn std::fmt::Display) -> AppError {
    AppError::Weather(WeatherError::FetchFailed(format!("{context}: {cause}")))
}
