use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use meteo_core::LoadState;
use meteo_weather::City;

use crate::app_services::AppServices;
use crate::services::{request_search, SearchServiceMessage};

/// One line of the search results list
#[derive(Debug, Clone, PartialEq)]
pub struct CityRow {
    pub name: String,
    pub country: String,
}

/// Search screen state: query text and the cities it produced.
pub struct SearchModel {
    services: Arc<AppServices>,
    query: String,
    state: LoadState<Vec<City>>,
    tx: Sender<SearchServiceMessage>,
    rx: Receiver<SearchServiceMessage>,
}

impl SearchModel {
    pub fn new(services: Arc<AppServices>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            services,
            query: String::new(),
            state: LoadState::Idle,
            tx,
            rx,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Start a search for the current query.
    ///
    /// Returns false (and does nothing) while a search is still running.
    pub fn submit(&mut self) -> bool {
        if !self.state.can_start() {
            tracing::debug!("Search already running, ignoring submit");
            return false;
        }
        self.state = std::mem::replace(&mut self.state, LoadState::Idle).on_start();
        request_search(&self.tx, &self.services, self.query.clone());
        true
    }

    /// Apply a finished search, if any. Returns true if the state changed.
    pub fn poll_channel(&mut self) -> bool {
        let msg = match self.rx.try_recv() {
            Ok(m) => m,
            Err(_) => return false,
        };

        match msg {
            SearchServiceMessage::SearchDone { query, result } => {
                let result = result.map_err(|e| e.user_message());
                if let Ok(cities) = &result {
                    tracing::info!("Search '{}' returned {} cities", query, cities.len());
                }
                self.state = std::mem::replace(&mut self.state, LoadState::Idle).on_done(result);
            }
        }
        true
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.state.error_message()
    }

    pub fn cities(&self) -> &[City] {
        self.state.data().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn row_count(&self) -> usize {
        self.cities().len()
    }

    pub fn city(&self, index: usize) -> Option<&City> {
        self.cities().get(index)
    }

    pub fn rows(&self) -> Vec<CityRow> {
        self.cities()
            .iter()
            .map(|city| CityRow {
                name: city.name.clone(),
                country: city.country.clone(),
            })
            .collect()
    }
}
