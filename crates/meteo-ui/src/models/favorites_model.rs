use meteo_services::FavoritesStore;
use meteo_weather::City;

use super::search_model::CityRow;

const EMPTY_PLACEHOLDER: &str = "No cities added yet";

/// Home screen list of favorite cities. Owns the store for the session.
#[derive(Debug, Default)]
pub struct FavoritesModel {
    store: FavoritesStore,
}

impl FavoritesModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &FavoritesStore {
        &self.store
    }

    /// Mutable access for detail screens that toggle membership.
    pub fn store_mut(&mut self) -> &mut FavoritesStore {
        &mut self.store
    }

    pub fn row_count(&self) -> usize {
        self.store.len()
    }

    pub fn city(&self, index: usize) -> Option<&City> {
        self.store.list().get(index)
    }

    pub fn rows(&self) -> Vec<CityRow> {
        self.store
            .list()
            .iter()
            .map(|city| CityRow {
                name: city.name.clone(),
                country: city.country.clone(),
            })
            .collect()
    }

    /// Text to show instead of the list when it is empty.
    pub fn placeholder(&self) -> Option<&'static str> {
        self.store.is_empty().then_some(EMPTY_PLACEHOLDER)
    }

    /// Remove the city shown at `index`. Returns false if out of range.
    pub fn remove_at(&mut self, index: usize) -> bool {
        match self.city(index).map(|city| city.id) {
            Some(id) => self.store.remove(id),
            None => false,
        }
    }
}
