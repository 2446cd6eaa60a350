//! Decode strategies for API payloads.
//!
//! Forecasts are one atomic structure and decode with [`strict`]: any missing
//! field or malformed date rejects the whole payload. Geocoding search results
//! are a list of independent records and decode with [`lenient`]: a bad record
//! is logged and dropped, the rest are kept.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::types::WeatherError;

/// `DecodingFailed` message for an envelope without `results`. The geocoder
/// sends that shape when nothing matches the query.
pub const MISSING_RESULTS: &str = "response has no \"results\"";

/// Decode the whole payload or fail.
pub fn strict<T: DeserializeOwned>(body: &[u8]) -> Result<T, WeatherError> {
    serde_json::from_slice(body).map_err(|e| WeatherError::DecodingFailed(e.to_string()))
}

/// Decode every element or fail on the first bad one.
pub fn strict_items<T: DeserializeOwned>(items: Vec<Value>) -> Result<Vec<T>, WeatherError> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item)
                .map_err(|e| WeatherError::DecodingFailed(format!("item {index}: {e}")))
        })
        .collect()
}

/// Decode each element on its own, skipping the ones that fail.
pub fn lenient<T: DeserializeOwned>(items: Vec<Value>) -> Vec<T> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!("Skipping result {}: {}", index, e);
                None
            }
        })
        .collect()
}

/// Extract the `results` array from a `{ "results": [...] }` envelope.
pub fn results_envelope(body: &[u8]) -> Result<Vec<Value>, WeatherError> {
    let top_level: Value = serde_json::from_slice(body)
        .map_err(|e| WeatherError::DecodingFailed(format!("invalid JSON: {e}")))?;

    let Value::Object(mut fields) = top_level else {
        return Err(WeatherError::DecodingFailed(
            "expected a JSON object at the top level".to_string(),
        ));
    };

    match fields.remove("results") {
        Some(Value::Array(results)) => Ok(results),
        Some(_) => Err(WeatherError::DecodingFailed(
            "\"results\" is not an array".to_string(),
        )),
        None => Err(WeatherError::DecodingFailed(MISSING_RESULTS.to_string())),
    }
}
