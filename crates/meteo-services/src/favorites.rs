// crates/meteo-services/src/favorites.rs

use meteo_weather::City;
use serde::{Deserialize, Serialize};

/// In-memory list of cities the user marked, in insertion order.
///
/// Membership is by city id. Nothing is persisted; the list lives as long as
/// its owner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoritesStore {
    cities: Vec<City>,
}

impl FavoritesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a city. Does not check for an existing entry with the same id.
    pub fn add(&mut self, city: City) {
        tracing::debug!(id = city.id, name = %city.name, "Adding favorite");
        self.cities.push(city);
    }

    /// Remove the first entry with `city_id`. Returns false if there was none.
    pub fn remove(&mut self, city_id: i64) -> bool {
        match self.cities.iter().position(|c| c.id == city_id) {
            Some(index) => {
                let removed = self.cities.remove(index);
                tracing::debug!(id = city_id, name = %removed.name, "Removed favorite");
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, city_id: i64) -> bool {
        self.cities.iter().any(|c| c.id == city_id)
    }

    pub fn list(&self) -> &[City] {
        &self.cities
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Add the city if absent, otherwise remove it. Returns the new membership.
    pub fn toggle(&mut self, city: City) -> bool {
        if self.contains(city.id) {
            self.remove(city.id);
            false
        } else {
            self.add(city);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(id: i64, name: &str) -> City {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": name,
            "latitude": 48.85,
            "longitude": 2.35,
            "elevation": 35.0,
            "timezone": "Europe/Paris",
            "population": 100000,
            "postcodes": [],
            "country": "France"
        }))
        .unwrap()
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = FavoritesStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let mut store = FavoritesStore::new();
        store.add(city(3, "Rome"));
        store.add(city(1, "Paris"));
        store.add(city(2, "Berlin"));

        let ids: Vec<i64> = store.list().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert!(store.contains(1));
        assert!(!store.contains(4));
    }

    #[test]
    fn test_add_same_id_twice_keeps_both() {
        let mut store = FavoritesStore::new();
        store.add(city(1, "Paris"));
        store.add(city(1, "Paris"));
        assert_eq!(store.len(), 2);

        assert!(store.remove(1));
        assert_eq!(store.len(), 1);
        assert!(store.contains(1));
    }

    #[test]
    fn test_remove_first_match_only() {
        let mut store = FavoritesStore::new();
        store.add(city(1, "Paris"));
        store.add(city(2, "Lyon"));
        store.add(city(1, "Paris (copy)"));

        assert!(store.remove(1));
        let names: Vec<&str> = store.list().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Lyon", "Paris (copy)"]);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut store = FavoritesStore::new();
        store.add(city(1, "Paris"));
        assert!(!store.remove(42));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_toggle() {
        let mut store = FavoritesStore::new();
        assert!(store.toggle(city(5, "Marseille")));
        assert!(store.contains(5));
        assert!(!store.toggle(city(5, "Marseille")));
        assert!(!store.contains(5));
        assert!(store.is_empty());
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let mut store = FavoritesStore::new();
        store.add(city(1, "Paris"));
        let value = serde_json::to_value(&store).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["name"], "Paris");
    }
}
