use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::{AppError, ConfigError};

type Result<T> = std::result::Result<T, AppError>;

/// Environment variable prefix for overrides, e.g. `SKYCAST__WEATHER__API_KEY`.
pub const ENV_PREFIX: &str = "SKYCAST";

/// Cities always shown on the dashboard unless the config file overrides them.
pub const DEFAULT_CATALOG_CITIES: &[&str] = &[
    "London",
    "Paris",
    "New York",
    "Tokyo",
    "Sydney",
    "Toronto",
    "Berlin",
    "Dubai",
    "Singapore",
    "Rio de Janeiro",
];

/// Maximum number of recently viewed cities the dashboard lists.
pub const DEFAULT_RECENT_DISPLAY_LIMIT: usize = 10;

const DEFAULT_WEATHER_BASE_URL: &str = "https://api.worldweatheronline.com/premium/v1/weather.ashx";
const VIEWED_CITIES_FILE: &str = "viewed_cities.json";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,

    /// Weather API settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Dashboard contents
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Endpoint of the current-conditions API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,

    /// API key, usually supplied through `SKYCAST__WEATHER__API_KEY`
    #[serde(default)]
    pub api_key: Option<String>,

    /// HTTP client timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_weather_base_url() -> String {
    DEFAULT_WEATHER_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Cities fetched on every dashboard launch, in display order
    #[serde(default = "default_catalog_cities")]
    pub catalog_cities: Vec<String>,

    /// Cap on the number of recently viewed cities shown
    #[serde(default = "default_recent_display_limit")]
    pub recent_display_limit: usize,

    /// JSON file holding viewed city names (defaults to `<config_dir>/viewed_cities.json`)
    #[serde(default)]
    pub viewed_cities_file: Option<PathBuf>,
}

fn default_catalog_cities() -> Vec<String> {
    DEFAULT_CATALOG_CITIES.iter().map(|c| c.to_string()).collect()
}

fn default_recent_display_limit() -> usize {
    DEFAULT_RECENT_DISPLAY_LIMIT
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            catalog_cities: default_catalog_cities(),
            recent_display_limit: default_recent_display_limit(),
            viewed_cities_file: None,
        }
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("skycast")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            weather: WeatherConfig::default(),
            dashboard: DashboardConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if it doesn't exist.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`, writing defaults there first if the file
    /// is missing. Environment variables prefixed with `SKYCAST__` override file values.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No config at {}, writing defaults", path.display());
            Self::default().save_to(path)?;
        }

        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path).format(::config::FileFormat::Toml))
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns [`ConfigError::Invalid`] if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config_path = Self::config_path()?;
        Self::load_validated_from(&config_path)
    }

    /// [`Config::load_validated`] against an explicit file.
    pub fn load_validated_from(path: &Path) -> Result<(Self, ValidationResult)> {
        let config = Self::load_from(path)?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.weather.base_url, "weather.base_url", &mut result);

        match self.weather.api_key.as_deref() {
            None => result.add_warning(
                "weather.api_key",
                "No API key configured - weather requests will likely be rejected",
            ),
            Some(key) if key.trim().is_empty() => {
                result.add_warning("weather.api_key", "API key is blank")
            }
            Some(_) => {}
        }

        if self.weather.timeout_secs == 0 {
            result.add_error("weather.timeout_secs", "Timeout must be greater than 0");
        } else if self.weather.timeout_secs > 120 {
            result.add_warning(
                "weather.timeout_secs",
                "Timeout is unusually long (>120 seconds)",
            );
        }

        if self.dashboard.catalog_cities.is_empty() {
            result.add_warning("dashboard.catalog_cities", "Catalog is empty");
        } else if self
            .dashboard
            .catalog_cities
            .iter()
            .any(|c| c.trim().is_empty())
        {
            result.add_error(
                "dashboard.catalog_cities",
                "Catalog contains a blank city name",
            );
        }

        if self.dashboard.recent_display_limit == 0 {
            result.add_warning(
                "dashboard.recent_display_limit",
                "Recent cities are hidden (limit is 0)",
            );
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if url.port() == Some(0) {
                    result.add_error(field_name, "Port cannot be 0");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Path of the viewed-cities file, resolved against `config_dir`.
    pub fn viewed_cities_path(&self) -> PathBuf {
        match &self.dashboard.viewed_cities_file {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => self.config_dir.join(path),
            None => self.config_dir.join(VIEWED_CITIES_FILE),
        }
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Invalid(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, contents)?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::NotFound("no config directory on this platform".into()))?
            .join("skycast");

        Ok(config_dir.join("config.toml"))
    }
}
