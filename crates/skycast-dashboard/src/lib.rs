//! Dashboard view-model for SkyCast
//!
//! Fetches current weather for the catalog cities and the user's recently
//! viewed cities through an injected [`WeatherFetch`](skycast_weather::WeatherFetch),
//! and filters the catalog locally for search.

pub mod aggregator;
pub mod filter;
pub mod listener;
pub mod viewed;

#[cfg(test)]
mod test_support;

pub use aggregator::{Dashboard, DashboardBuilder};
pub use filter::{filter_records, in_search_mode};
pub use listener::{CallbackListener, DashboardListener, DashboardMessage};
pub use viewed::{
    normalize_city_name, JsonViewedCityStore, StaticViewedCities, ViewedCityStore,
    VIEWED_CITIES_KEY,
};
