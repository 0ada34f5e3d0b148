//! Weather lookups for SkyCast
//!
//! Current conditions per city via a World Weather Online style API, behind the
//! [`WeatherFetch`] capability so the dashboard can be driven by any source.

mod error_mapping;
pub mod provider;
mod response;
pub mod types;

pub use provider::{WeatherFetch, WorldWeatherClient};
pub use types::*;
