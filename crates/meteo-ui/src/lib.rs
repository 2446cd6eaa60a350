//! Headless presentation layer for Meteo.
//!
//! Views hold a model, call its request methods, and poll it on their own
//! loop. Network work runs on the tokio runtime held by [`AppServices`] and
//! results come back over `std::sync::mpsc`.

pub mod app_services;
pub mod error_mapping;
pub mod models;
pub mod services;

pub use app_services::AppServices;
pub use models::{CityModel, CityRow, DayRow, FavoritesModel, Headline, SearchModel};
