pub mod city_model;
pub mod favorites_model;
pub mod search_model;

pub use city_model::{CityModel, DayRow, Headline};
pub use favorites_model::FavoritesModel;
pub use search_model::{CityRow, SearchModel};
