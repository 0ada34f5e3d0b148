pub mod config;
pub mod error;

pub use crate::config::{Config, DashboardConfig, ValidationResult, WeatherConfig};
pub use crate::error::{
    AppError, ConfigError, NetworkError, ReqwestErrorExt, StorageError, WeatherError,
};

use anyhow::Result;

/// Initialize logging for a SkyCast binary.
///
/// Honors `RUST_LOG`, defaulting to `info`. Libraries in this workspace only emit
/// `tracing` events and never install a subscriber themselves.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    tracing::info!("SkyCast core initialized");
    Ok(())
}
