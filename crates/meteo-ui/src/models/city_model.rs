use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use meteo_core::LoadState;
use meteo_services::FavoritesStore;
use meteo_weather::units::{format_rounded, format_timestamp};
use meteo_weather::{City, WeatherData};

use crate::app_services::AppServices;
use crate::services::{request_forecast_fetch, ForecastServiceMessage};

const ADD_LABEL: &str = "Add to List";
const REMOVE_LABEL: &str = "Remove from List";

/// Current conditions, ready to display
#[derive(Debug, Clone, PartialEq)]
pub struct Headline {
    pub temperature: String,
    pub condition: String,
    pub icon: String,
    pub updated_at: String,
}

/// One day of the forecast list
#[derive(Debug, Clone, PartialEq)]
pub struct DayRow {
    pub label: String,
    pub icon: String,
    pub max_temperature: String,
    pub rain: String,
    pub wind: String,
    pub sunshine: String,
}

/// Detail screen for one city: its forecast and favorite status.
pub struct CityModel {
    services: Arc<AppServices>,
    city: City,
    state: LoadState<WeatherData>,
    tx: Sender<ForecastServiceMessage>,
    rx: Receiver<ForecastServiceMessage>,
}

impl CityModel {
    pub fn new(services: Arc<AppServices>, city: City) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            services,
            city,
            state: LoadState::Idle,
            tx,
            rx,
        }
    }

    pub fn city(&self) -> &City {
        &self.city
    }

    /// Fetch the forecast again. Previous data is dropped.
    ///
    /// Returns false while a fetch is already running.
    pub fn refresh(&mut self) -> bool {
        if !self.state.can_start() {
            return false;
        }
        self.state = std::mem::replace(&mut self.state, LoadState::Idle).on_start();
        request_forecast_fetch(
            &self.tx,
            &self.services,
            self.city.id,
            self.city.latitude,
            self.city.longitude,
        );
        true
    }

    /// Apply a finished fetch, if any. Returns true if the state changed.
    pub fn poll_channel(&mut self) -> bool {
        let msg = match self.rx.try_recv() {
            Ok(m) => m,
            Err(_) => return false,
        };

        match msg {
            ForecastServiceMessage::FetchDone { city_id, result } => {
                if city_id != self.city.id {
                    tracing::debug!("Dropping forecast for city {}", city_id);
                    return false;
                }
                let result = result.map_err(|e| e.user_message());
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

    pub fn weather(&self) -> Option<&WeatherData> {
        self.state.data()
    }

    pub fn headline(&self) -> Option<Headline> {
        let current = &self.weather()?.current;
        let condition = current.condition();
        Some(Headline {
            temperature: format!("{}°", format_rounded(current.temperature)),
            condition: condition.description().to_string(),
            icon: condition.icon_name().to_string(),
            updated_at: format_timestamp(&current.time),
        })
    }

    /// Rows for every day that has all of its values. A day missing any value
    /// is left out; labels keep the day's position in the series.
    pub fn day_rows(&self) -> Vec<DayRow> {
        let Some(data) = self.weather() else {
            return Vec::new();
        };

        (0..data.daily.horizon())
            .filter_map(|index| {
                let day = data.daily.day(index)?;
                Some(DayRow {
                    label: format!("Weather for Day {}", index + 1),
                    icon: day.condition.icon_name().to_string(),
                    max_temperature: format!("{}°", format_rounded(day.temperature_max)),
                    rain: format!("{} mm", format_rounded(day.rain_sum)),
                    wind: format!("{} km/h", format_rounded(day.wind_speed_max)),
                    sunshine: day.sunshine().to_string(),
                })
            })
            .collect()
    }

    pub fn is_favorite(&self, favorites: &FavoritesStore) -> bool {
        favorites.contains(self.city.id)
    }

    /// Add or remove this city. Returns the new membership.
    pub fn toggle_favorite(&self, favorites: &mut FavoritesStore) -> bool {
        let added = favorites.toggle(self.city.clone());
        tracing::info!(
            "{} '{}' {} favorites",
            if added { "Added" } else { "Removed" },
            self.city.name,
            if added { "to" } else { "from" }
        );
        added
    }

    pub fn favorite_button_label(&self, favorites: &FavoritesStore) -> &'static str {
        if self.is_favorite(favorites) {
            REMOVE_LABEL
        } else {
            ADD_LABEL
        }
    }
}
