//! Forecast backend: async weather fetching off the UI thread.
//! Results are sent back via mpsc.

use std::sync::mpsc::Sender;

use meteo_core::AppError;
use meteo_weather::WeatherData;

use crate::app_services::AppServices;
use crate::error_mapping::from_weather_error;

/// Messages sent from async operations back to the UI thread
#[derive(Debug)]
pub enum ForecastServiceMessage {
    /// Result of fetching the forecast for one city
    FetchDone {
        city_id: i64,
        result: Result<WeatherData, AppError>,
    },
}

/// Request the forecast for a city's coordinates asynchronously.
/// Sends `FetchDone` on the channel when complete.
pub fn request_fetch(
    tx: &Sender<ForecastServiceMessage>,
    services: &AppServices,
    city_id: i64,
    latitude: f64,
    longitude: f64,
) {
    let tx = tx.clone();
    let client = services.forecast();

    services.runtime().spawn(async move {
        let result = client
            .fetch_forecast(latitude, longitude)
            .await
            .map_err(from_weather_error);
        let _ = tx.send(ForecastServiceMessage::FetchDone { city_id, result });
    });
}
