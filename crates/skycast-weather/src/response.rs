//! Wire format of the current-conditions endpoint.
//!
//! The API reports every number as a string and signals unknown locations with
//! a 200 response carrying `data.error`, so parsing happens in two steps:
//! deserialize loosely, then validate into a [`WeatherRecord`].

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::types::{CurrentConditions, FetchError, WeatherCondition, WeatherRecord};

#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse {
    data: ApiData,
}

#[derive(Debug, Deserialize)]
struct ApiData {
    #[serde(default)]
    request: Vec<ApiRequest>,
    #[serde(default)]
    current_condition: Vec<ApiCurrentCondition>,
    #[serde(default)]
    error: Vec<ApiMessage>,
}

#[derive(Debug, Deserialize)]
struct ApiRequest {
    #[serde(rename = "type", default)]
    kind: String,
    query: String,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    msg: String,
}

#[derive(Debug, Deserialize)]
struct ApiValue {
    value: String,
}

#[derive(Debug, Deserialize)]
struct ApiCurrentCondition {
    #[serde(default)]
    observation_time: String,
    #[serde(rename = "temp_C")]
    temp_c: String,
    #[serde(rename = "temp_F")]
    temp_f: String,
    #[serde(rename = "FeelsLikeC", default)]
    feels_like_c: Option<String>,
    #[serde(rename = "FeelsLikeF", default)]
    feels_like_f: Option<String>,
    #[serde(rename = "weatherCode")]
    weather_code: String,
    #[serde(rename = "weatherDesc", default)]
    weather_desc: Vec<ApiValue>,
    #[serde(rename = "windspeedKmph", default)]
    windspeed_kmph: Option<String>,
    #[serde(default)]
    humidity: Option<String>,
}

fn parse_field<T: FromStr>(field: &str, raw: &str) -> Result<T, FetchError> {
    raw.trim()
        .parse()
        .map_err(|_| FetchError::Parse(format!("{} is not a number: {:?}", field, raw)))
}

fn parse_optional<T: FromStr>(raw: Option<&str>) -> Option<T> {
    raw.and_then(|v| v.trim().parse().ok())
}

impl ApiResponse {
    pub(crate) fn into_record(self, fetched_at: DateTime<Utc>) -> Result<WeatherRecord, FetchError> {
        let ApiData {
            request,
            current_condition,
            error,
        } = self.data;

        if !error.is_empty() {
            let message = error
                .into_iter()
                .map(|e| e.msg)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(FetchError::CityNotFound(message));
        }

        let request = request
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::Parse("response has no request entry".to_string()))?;
        let current = current_condition
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::Parse("response has no current_condition".to_string()))?;

        let temperature_c: f64 = parse_field("temp_C", &current.temp_c)?;
        let temperature_f: f64 = parse_field("temp_F", &current.temp_f)?;
        let weather_code: u16 = parse_field("weatherCode", &current.weather_code)?;
        let condition = WeatherCondition::from_wwo_code(weather_code);

        let description = current
            .weather_desc
            .into_iter()
            .next()
            .map(|d| d.value.trim().to_string())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| condition.description().to_string());

        Ok(WeatherRecord {
            city_name: request.query,
            query_type: request.kind,
            current: CurrentConditions {
                temperature_c,
                temperature_f,
                feels_like_c: parse_optional(current.feels_like_c.as_deref())
                    .unwrap_or(temperature_c),
                feels_like_f: parse_optional(current.feels_like_f.as_deref())
                    .unwrap_or(temperature_f),
                humidity: parse_optional(current.humidity.as_deref()),
                wind_speed_kmph: parse_optional(current.windspeed_kmph.as_deref()),
                weather_code,
                condition,
                description,
                observation_time: current.observation_time,
            },
            fetched_at,
        })
    }
}
