pub mod forecast_service;
pub mod search_service;

pub use forecast_service::{request_fetch as request_forecast_fetch, ForecastServiceMessage};
pub use search_service::{request_search, SearchServiceMessage};
