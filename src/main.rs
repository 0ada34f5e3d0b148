use std::sync::Arc;

use anyhow::{Context, Result};
use skycast_core::{AppError, Config};
use skycast_dashboard::{CallbackListener, Dashboard, JsonViewedCityStore};
use skycast_weather::{WeatherRecord, WorldWeatherClient};

fn print_records(title: &str, records: &[WeatherRecord]) {
    println!("\n{} ({})", title, records.len());
    for record in records {
        println!(
            "  {:<36} {:>5.1}°C  {}",
            record.city_name, record.current.temperature_c, record.current.description
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    skycast_core::init()?;

    let (config, _) = Config::load_validated().map_err(|e| {
        tracing::error!("{}", e.user_message());
        e
    })?;
    // Optional search text, e.g. `skycast par`
    let search = std::env::args().nth(1);

    let fetcher = WorldWeatherClient::from_config(&config.weather)
        .context("Failed to create weather client")?;
    let viewed_store = JsonViewedCityStore::new(config.viewed_cities_path());
    tracing::debug!("Reading viewed cities from {}", viewed_store.path().display());

    let listener = CallbackListener::new().with_error(|error| {
        let app_error = AppError::from(error.clone());
        tracing::warn!("{} ({})", app_error.user_message(), app_error);
    });

    let (dashboard, batches) = Dashboard::builder(Arc::new(fetcher), Arc::new(viewed_store))
        .with_config(&config.dashboard)
        .listener(Arc::new(listener))
        .launch();

    batches.await.context("Dashboard fetch task failed")?;
    dashboard.update_search(search.as_deref());

    print_records("Cities", &dashboard.catalog_results());

    let recent = dashboard.viewed_results();
    let shown = dashboard.recent_city_display_count().min(recent.len());
    print_records("Recently viewed", &recent[..shown]);

    if let Some(text) = search.as_deref() {
        print_records(&format!("Matching \"{}\"", text), &dashboard.filtered_cities());
    }

    Ok(())
}
