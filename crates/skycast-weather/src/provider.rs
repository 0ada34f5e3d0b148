//! Weather fetch capability and its HTTP implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use skycast_core::{NetworkError, ReqwestErrorExt, WeatherConfig};

use crate::response::ApiResponse;
use crate::types::{FetchError, WeatherRecord};

const USER_AGENT: &str = "SkyCast/0.1.0";

/// Looks up current weather for one city.
///
/// One call per city; implementations must not assume any batching. The
/// dashboard calls this concurrently from several tasks.
#[async_trait]
pub trait WeatherFetch: Send + Sync {
    async fn fetch(&self, city: &str) -> Result<WeatherRecord, FetchError>;
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        match e.into_network_error() {
            NetworkError::Timeout => FetchError::Timeout,
            NetworkError::ServerError { status, message } => FetchError::Status { status, message },
            NetworkError::InvalidResponse(message) => FetchError::Parse(message),
            NetworkError::ConnectionFailed(message) => FetchError::Network(message),
        }
    }
}

/// Client for a World Weather Online compatible current-conditions endpoint.
#[derive(Debug, Clone)]
pub struct WorldWeatherClient {
    client: Arc<Client>,
    base_url: String,
    api_key: Option<String>,
}

impl WorldWeatherClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.into(),
            api_key,
        })
    }

    pub fn from_config(config: &WeatherConfig) -> Result<Self, FetchError> {
        Self::new(
            config.base_url.clone(),
            config.api_key.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Build the request URL for `city`.
    ///
    /// `+` is the word separator the API expects, so each `+`-separated segment is
    /// percent-encoded on its own and the separators are kept literally.
    fn request_url(&self, city: &str) -> String {
        let query = city
            .split('+')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("+");

        match self.api_key.as_deref() {
            Some(key) => format!(
                "{}?key={}&q={}&format=json&num_of_days=1",
                self.base_url,
                urlencoding::encode(key),
                query
            ),
            None => format!("{}?q={}&format=json&num_of_days=1", self.base_url, query),
        }
    }
}

#[async_trait]
impl WeatherFetch for WorldWeatherClient {
    async fn fetch(&self, city: &str) -> Result<WeatherRecord, FetchError> {
        if city.trim().is_empty() {
            return Err(FetchError::InvalidCity(city.to_string()));
        }

        tracing::debug!("Fetching weather for {}", city);

        let response = self.client.get(self.request_url(city)).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::debug!("Weather API returned status {} for {}", status, city);
            return Err(FetchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let parsed: ApiResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Parse(e.to_string()))?;

        parsed.into_record(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_key: Option<&str>) -> WorldWeatherClient {
        WorldWeatherClient::new(
            "https://weather.example.com/v1/weather.ashx",
            api_key.map(str::to_string),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_request_url_keeps_plus_separator() {
        let url = client(Some("abc")).request_url("New+York");
        assert_eq!(
            url,
            "https://weather.example.com/v1/weather.ashx?key=abc&q=New+York&format=json&num_of_days=1"
        );
    }

    #[test]
    fn test_request_url_encodes_reserved_characters() {
        let url = client(None).request_url("Saint-Denis&x=1");
        assert!(url.contains("q=Saint-Denis%26x%3D1&"));
        assert!(!url.contains("key="));
    }

    #[test]
    fn test_request_url_encodes_unnormalized_spaces() {
        let url = client(None).request_url("Rio de Janeiro");
        assert!(url.contains("q=Rio%20de%20Janeiro&"));
    }

    #[tokio::test]
    async fn test_blank_city_is_rejected_without_request() {
        let result = client(Some("abc")).fetch("   ").await;
        assert!(matches!(result, Err(FetchError::InvalidCity(_))));
    }
}
