use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Weather condition categories mapped from provider weather codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    #[default]
    Clear,
    PartlyCloudy,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    HeavyRain,
    Snow,
    Sleet,
    Thunderstorm,
}

impl WeatherCondition {
    /// Convert a World Weather Online condition code to a WeatherCondition
    /// See: https://www.worldweatheronline.com/weather-api/api/docs/weather-icons.aspx
    pub fn from_wwo_code(code: u16) -> Self {
        match code {
            113 => Self::Clear,
            116 => Self::PartlyCloudy,
            119 | 122 => Self::Cloudy,
            143 | 248 | 260 => Self::Fog,
            176 | 263 | 266 | 293 | 296 | 353 => Self::Drizzle,
            299 | 302 | 356 => Self::Rain,
            305 | 308 | 359 => Self::HeavyRain,
            179 | 227 | 230 | 323 | 326 | 329 | 332 | 335 | 338 | 368 | 371 => Self::Snow,
            182 | 185 | 281 | 284 | 311 | 314 | 317 | 320 | 350 | 362 | 365 | 374 | 377 => {
                Self::Sleet
            }
            200 | 386 | 389 | 392 | 395 => Self::Thunderstorm,
            _ => Self::Clear, // Unknown codes default to clear
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Cloudy => "Cloudy",
            Self::Fog => "Fog",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::HeavyRain => "Heavy Rain",
            Self::Snow => "Snow",
            Self::Sleet => "Sleet",
            Self::Thunderstorm => "Thunderstorm",
        }
    }

    /// Icon name consumed by the UI layer
    pub fn icon_name(&self) -> &'static str {
        match self {
            Self::Clear => "sun",
            Self::PartlyCloudy => "cloud_sun",
            Self::Cloudy => "cloud",
            Self::Fog => "cloud_fog",
            Self::Drizzle | Self::Rain | Self::HeavyRain => "cloud_rain",
            Self::Snow | Self::Sleet => "cloud_snow",
            Self::Thunderstorm => "cloud_lightning",
        }
    }
}

/// Current weather conditions for one city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: f64,
    pub temperature_f: f64,
    pub feels_like_c: f64,
    pub feels_like_f: f64,
    pub humidity: Option<u8>,
    pub wind_speed_kmph: Option<f64>,
    pub weather_code: u16,
    pub condition: WeatherCondition,
    /// Provider's own wording, e.g. "Patchy rain possible"
    pub description: String,
    /// Observation time as reported by the provider (UTC, "hh:mm AM")
    pub observation_time: String,
}

/// A single city's current weather snapshot. Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    /// Resolved location name, e.g. "Paris, France"
    pub city_name: String,
    /// How the provider interpreted the query ("City", "LatLon", ...)
    pub query_type: String,
    pub current: CurrentConditions,
    pub fetched_at: DateTime<Utc>,
}

impl WeatherRecord {
    /// Case-insensitive substring match against the city name.
    /// `needle` must already be lowercase.
    pub fn city_name_contains(&self, needle: &str) -> bool {
        self.city_name.to_lowercase().contains(needle)
    }
}

/// Errors from a single weather lookup
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Request timed out")]
    Timeout,
    #[error("Weather API returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("City not found: {0}")]
    CityNotFound(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid city name: {0:?}")]
    InvalidCity(String),
    #[error("Fetch task failed: {0}")]
    Task(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> WeatherRecord {
        WeatherRecord {
            city_name: name.to_string(),
            query_type: "City".to_string(),
            current: CurrentConditions {
                temperature_c: 12.0,
                temperature_f: 54.0,
                feels_like_c: 11.0,
                feels_like_f: 52.0,
                humidity: Some(70),
                wind_speed_kmph: Some(9.0),
                weather_code: 116,
                condition: WeatherCondition::PartlyCloudy,
                description: "Partly cloudy".to_string(),
                observation_time: "09:00 AM".to_string(),
            },
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn test_wwo_code_clear_and_clouds() {
        assert_eq!(WeatherCondition::from_wwo_code(113), WeatherCondition::Clear);
        assert_eq!(WeatherCondition::from_wwo_code(116), WeatherCondition::PartlyCloudy);
        assert_eq!(WeatherCondition::from_wwo_code(119), WeatherCondition::Cloudy);
        assert_eq!(WeatherCondition::from_wwo_code(122), WeatherCondition::Cloudy);
    }

    #[test]
    fn test_wwo_code_fog() {
        assert_eq!(WeatherCondition::from_wwo_code(143), WeatherCondition::Fog);
        assert_eq!(WeatherCondition::from_wwo_code(248), WeatherCondition::Fog);
    }

    #[test]
    fn test_wwo_code_rain_intensity() {
        assert_eq!(WeatherCondition::from_wwo_code(296), WeatherCondition::Drizzle);
        assert_eq!(WeatherCondition::from_wwo_code(302), WeatherCondition::Rain);
        assert_eq!(WeatherCondition::from_wwo_code(308), WeatherCondition::HeavyRain);
    }

    #[test]
    fn test_wwo_code_frozen() {
        assert_eq!(WeatherCondition::from_wwo_code(338), WeatherCondition::Snow);
        assert_eq!(WeatherCondition::from_wwo_code(314), WeatherCondition::Sleet);
    }

    #[test]
    fn test_wwo_code_thunderstorm() {
        assert_eq!(WeatherCondition::from_wwo_code(200), WeatherCondition::Thunderstorm);
        assert_eq!(WeatherCondition::from_wwo_code(389), WeatherCondition::Thunderstorm);
    }

    #[test]
    fn test_wwo_code_unknown_defaults_to_clear() {
        assert_eq!(WeatherCondition::from_wwo_code(999), WeatherCondition::Clear);
        assert_eq!(WeatherCondition::from_wwo_code(0), WeatherCondition::Clear);
    }

    #[test]
    fn test_condition_description_and_icon() {
        assert_eq!(WeatherCondition::HeavyRain.description(), "Heavy Rain");
        assert_eq!(WeatherCondition::Sleet.icon_name(), "cloud_snow");
    }

    #[test]
    fn test_city_name_contains_is_case_insensitive() {
        let paris = record("Paris, France");
        assert!(paris.city_name_contains("par"));
        assert!(paris.city_name_contains("france"));
        assert!(!record("London, United Kingdom").city_name_contains("par"));
    }
}
