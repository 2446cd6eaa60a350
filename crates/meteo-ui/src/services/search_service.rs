//! City search backend: async geocoding off the UI thread.
//! Results are sent back via mpsc.

use std::sync::mpsc::Sender;

use meteo_core::AppError;
use meteo_weather::City;

use crate::app_services::AppServices;
use crate::error_mapping::from_weather_error;

/// Messages sent from async operations back to the UI thread
#[derive(Debug)]
pub enum SearchServiceMessage {
    /// Result of a search, tagged with the query that produced it
    SearchDone {
        query: String,
        result: Result<Vec<City>, AppError>,
    },
}

/// Request a city search asynchronously.
/// Sends `SearchDone` on the channel when complete. An empty query loads the
/// fallback cities.
pub fn request_search(tx: &Sender<SearchServiceMessage>, services: &AppServices, query: String) {
    let tx = tx.clone();
    let client = services.geocoding();

    services.runtime().spawn(async move {
        let result = client.search(&query).await.map_err(from_weather_error);
        if let Err(e) = &result {
            tracing::warn!("Search for '{}' failed: {}", query, e);
        }
        // Receiver gone means the view was closed
        let _ = tx.send(SearchServiceMessage::SearchDone { query, result });
    });
}
