use skycast_core::{AppError, NetworkError, WeatherError};
use crate::types::FetchError;

impl From<FetchError> for AppError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Network(s) => AppError::Network(NetworkError::ConnectionFailed(s)),
            FetchError::Timeout => AppError::Network(NetworkError::Timeout),
            FetchError::Status { status: 401 | 403, .. } => {
                AppError::Weather(WeatherError::InvalidApiKey)
            }
            FetchError::Status { status, .. } if status >= 500 => {
                AppError::Weather(WeatherError::ServiceUnavailable)
            }
            FetchError::Status { status, message } => {
                AppError::Weather(WeatherError::ApiError(format!("{}: {}", status, message)))
            }
            FetchError::CityNotFound(s) => AppError::Weather(WeatherError::CityNotFound(s)),
            FetchError::Parse(s) => AppError::Network(NetworkError::InvalidResponse(s)),
            FetchError::InvalidCity(s) => AppError::Weather(WeatherError::InvalidCity(s)),
            FetchError::Task(s) => AppError::Service(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_key_maps_to_invalid_api_key() {
        let app: AppError = FetchError::Status {
            status: 401,
            message: "Unauthorized".into(),
        }
        .into();
        assert!(matches!(app, AppError::Weather(WeatherError::InvalidApiKey)));
    }

    #[test]
    fn server_status_maps_to_service_unavailable() {
        let app: AppError = FetchError::Status {
            status: 502,
            message: "Bad Gateway".into(),
        }
        .into();
        assert!(matches!(app, AppError::Weather(WeatherError::ServiceUnavailable)));
        assert!(app.user_message().contains("later"));
    }

    #[test]
    fn other_status_is_api_error_with_detail() {
        let app: AppError = FetchError::Status {
            status: 429,
            message: "Too Many Requests".into(),
        }
        .into();
        match &app {
            AppError::Weather(WeatherError::ApiError(detail)) => {
                assert!(detail.contains("429"), "detail: {}", detail)
            }
            other => panic!("expected api error, got {:?}", other),
        }
        assert_eq!(app.user_message(), "Weather service error. Please try again.");
    }

    #[test]
    fn timeout_and_parse_map_to_network_errors() {
        let timeout: AppError = FetchError::Timeout.into();
        assert!(matches!(timeout, AppError::Network(NetworkError::Timeout)));

        let parse: AppError = FetchError::Parse("missing current_condition".into()).into();
        assert!(matches!(
            parse,
            AppError::Network(NetworkError::InvalidResponse(_))
        ));
    }

    #[test]
    fn unknown_city_keeps_its_message() {
        let app: AppError = FetchError::CityNotFound("Atlantis".into()).into();
        assert!(app.to_string().contains("Atlantis"));
        assert_eq!(app.user_message(), "City not found. Check the name and try again.");
    }

    #[test]
    fn task_failure_is_service_error() {
        let app: AppError = FetchError::Task("panicked".into()).into();
        assert!(matches!(app, AppError::Service(_)));
    }
}
