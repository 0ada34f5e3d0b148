//! Dashboard aggregator: fans out one weather lookup per city and collects the
//! results as they complete.
//!
//! Each batch spawns its lookups onto a [`JoinSet`] and appends records in
//! completion order. Both result lists sit behind one mutex; listeners are
//! notified after the lock is released so they can read the dashboard back.

use std::sync::Arc;

use parking_lot::Mutex;
use skycast_core::config::{DEFAULT_CATALOG_CITIES, DEFAULT_RECENT_DISPLAY_LIMIT};
use skycast_core::{AppError, DashboardConfig};
use skycast_weather::{FetchError, WeatherFetch, WeatherRecord};
use tokio::task::{JoinError, JoinHandle, JoinSet};

use crate::filter::filter_records;
use crate::listener::{CallbackListener, DashboardListener};
use crate::viewed::{normalize_city_name, ViewedCityStore};

type LookupResult = (String, Result<WeatherRecord, FetchError>);

#[derive(Debug, Default)]
struct DashboardState {
    catalog_results: Vec<WeatherRecord>,
    viewed_results: Vec<WeatherRecord>,
    filtered: Vec<WeatherRecord>,
    /// Bumped on every viewed-cities reset; lookups from older batches are dropped.
    viewed_generation: u64,
}

struct Inner {
    fetcher: Arc<dyn WeatherFetch>,
    viewed_store: Arc<dyn ViewedCityStore>,
    listener: Arc<dyn DashboardListener>,
    catalog: Vec<String>,
    recent_limit: usize,
    state: Mutex<DashboardState>,
}

/// Weather for the catalog cities and the user's recently viewed cities.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<Inner>,
}

/// Configures a [`Dashboard`] before its first fetch.
pub struct DashboardBuilder {
    fetcher: Arc<dyn WeatherFetch>,
    viewed_store: Arc<dyn ViewedCityStore>,
    listener: Arc<dyn DashboardListener>,
    catalog: Vec<String>,
    recent_limit: usize,
}

impl DashboardBuilder {
    pub fn listener(mut self, listener: Arc<dyn DashboardListener>) -> Self {
        self.listener = listener;
        self
    }

    pub fn catalog<I, S>(mut self, cities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.catalog = cities.into_iter().map(Into::into).collect();
        self
    }

    pub fn recent_display_limit(mut self, limit: usize) -> Self {
        self.recent_limit = limit;
        self
    }

    /// Take the catalog and display limit from configuration.
    pub fn with_config(self, config: &DashboardConfig) -> Self {
        self.catalog(config.catalog_cities.iter().cloned())
            .recent_display_limit(config.recent_display_limit)
    }

    /// Build without fetching anything.
    pub fn build(self) -> Dashboard {
        Dashboard {
            inner: Arc::new(Inner {
                fetcher: self.fetcher,
                viewed_store: self.viewed_store,
                listener: self.listener,
                catalog: self.catalog,
                recent_limit: self.recent_limit,
                state: Mutex::new(DashboardState::default()),
            }),
        }
    }

    /// Build and immediately start the catalog and viewed-cities batches.
    ///
    /// Must be called from within a Tokio runtime. The returned handle resolves
    /// once both batches have drained.
    pub fn launch(self) -> (Dashboard, JoinHandle<()>) {
        let dashboard = self.build();
        let worker = dashboard.clone();
        let handle = tokio::spawn(async move {
            tokio::join!(
                worker.fetch_catalog_weather(),
                worker.fetch_viewed_cities_weather()
            );
        });
        (dashboard, handle)
    }
}

impl Dashboard {
    pub fn builder(
        fetcher: Arc<dyn WeatherFetch>,
        viewed_store: Arc<dyn ViewedCityStore>,
    ) -> DashboardBuilder {
        DashboardBuilder {
            fetcher,
            viewed_store,
            listener: Arc::new(CallbackListener::default()),
            catalog: DEFAULT_CATALOG_CITIES.iter().map(|c| c.to_string()).collect(),
            recent_limit: DEFAULT_RECENT_DISPLAY_LIMIT,
        }
    }

    /// Look up every catalog city and append each record as it arrives.
    ///
    /// Failed lookups go to the listener's error callback and are otherwise
    /// skipped. Returns once every lookup has finished.
    pub async fn fetch_catalog_weather(&self) {
        let total = self.inner.catalog.len();
        tracing::info!("Fetching weather for {} catalog cities", total);

        let mut lookups = self.spawn_lookups(self.inner.catalog.iter().cloned());
        let mut received = 0;

        while let Some(joined) = lookups.join_next().await {
            match settle(joined) {
                Ok(record) => {
                    received += 1;
                    self.append_catalog(record);
                }
                Err(e) => self.report_error(&e),
            }
        }

        tracing::info!("Catalog batch finished: {}/{} cities", received, total);
    }

    /// Reload the viewed-city names and look each of them up.
    ///
    /// The viewed list is cleared before the lookups start. Blank names are
    /// skipped and the rest are normalized for the weather API. If a newer call
    /// starts while this one is in flight, this call's remaining records are
    /// discarded.
    pub async fn fetch_viewed_cities_weather(&self) {
        let names = match self.inner.viewed_store.viewed_city_names() {
            Ok(names) => names,
            Err(e) => {
                let e = AppError::from(e);
                tracing::warn!("{} Showing none ({})", e.user_message(), e);
                Vec::new()
            }
        };

        let queries: Vec<String> = names
            .iter()
            .filter_map(|name| normalize_city_name(name))
            .collect();

        let generation = {
            let mut state = self.inner.state.lock();
            state.viewed_generation += 1;
            state.viewed_results.clear();
            state.viewed_generation
        };
        self.inner.listener.on_dashboard_updated();

        tracing::info!(
            "Fetching weather for {} viewed cities ({} stored names)",
            queries.len(),
            names.len()
        );

        let mut lookups = self.spawn_lookups(queries);
        while let Some(joined) = lookups.join_next().await {
            match settle(joined) {
                Ok(record) => self.append_viewed(generation, record),
                Err(e) => self.report_error(&e),
            }
        }
    }

    /// Number of recently viewed cities to display, capped at the display limit.
    pub fn recent_city_display_count(&self) -> usize {
        self.inner
            .state
            .lock()
            .viewed_results
            .len()
            .min(self.inner.recent_limit)
    }

    /// Recompute the filtered catalog for `search_text` and notify.
    pub fn update_search(&self, search_text: Option<&str>) {
        {
            let mut state = self.inner.state.lock();
            state.filtered = filter_records(&state.catalog_results, search_text);
        }
        self.inner.listener.on_dashboard_updated();
    }

    /// Append a catalog record obtained elsewhere and return the updated list.
    pub fn record_catalog(&self, record: WeatherRecord) -> Vec<WeatherRecord> {
        let snapshot = {
            let mut state = self.inner.state.lock();
            state.catalog_results.push(record);
            state.catalog_results.clone()
        };
        self.inner.listener.on_dashboard_updated();
        snapshot
    }

    /// Append a viewed-city record obtained elsewhere and return the updated list.
    pub fn record_viewed(&self, record: WeatherRecord) -> Vec<WeatherRecord> {
        let snapshot = {
            let mut state = self.inner.state.lock();
            state.viewed_results.push(record);
            state.viewed_results.clone()
        };
        self.inner.listener.on_dashboard_updated();
        snapshot
    }

    /// Configured catalog city names, in request order.
    pub fn catalog(&self) -> &[String] {
        &self.inner.catalog
    }

    pub fn catalog_results(&self) -> Vec<WeatherRecord> {
        self.inner.state.lock().catalog_results.clone()
    }

    pub fn viewed_results(&self) -> Vec<WeatherRecord> {
        self.inner.state.lock().viewed_results.clone()
    }

    /// Result of the last [`update_search`](Self::update_search).
    pub fn filtered_cities(&self) -> Vec<WeatherRecord> {
        self.inner.state.lock().filtered.clone()
    }

    fn spawn_lookups(&self, queries: impl IntoIterator<Item = String>) -> JoinSet<LookupResult> {
        let mut lookups = JoinSet::new();
        for query in queries {
            let fetcher = Arc::clone(&self.inner.fetcher);
            lookups.spawn(async move {
                let result = fetcher.fetch(&query).await;
                (query, result)
            });
        }
        lookups
    }

    fn append_catalog(&self, record: WeatherRecord) {
        tracing::debug!("Catalog weather received for {}", record.city_name);
        self.inner.state.lock().catalog_results.push(record);
        self.inner.listener.on_dashboard_updated();
    }

    fn append_viewed(&self, generation: u64, record: WeatherRecord) {
        {
            let mut state = self.inner.state.lock();
            if state.viewed_generation != generation {
                tracing::debug!("Dropping stale viewed-city result for {}", record.city_name);
                return;
            }
            state.viewed_results.push(record);
        }
        self.inner.listener.on_dashboard_updated();
    }

    fn report_error(&self, error: &FetchError) {
        self.inner.listener.on_error(error);
    }
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Dashboard")
            .field("catalog", &self.inner.catalog)
            .field("catalog_results", &state.catalog_results.len())
            .field("viewed_results", &state.viewed_results.len())
            .finish()
    }
}

/// Collapse a finished lookup task into its record or error.
fn settle(joined: Result<LookupResult, JoinError>) -> Result<WeatherRecord, FetchError> {
    match joined {
        Ok((_, Ok(record))) => Ok(record),
        Ok((query, Err(e))) => {
            tracing::warn!("Weather lookup for {} failed: {}", query, e);
            Err(e)
        }
        Err(e) => {
            tracing::error!("Weather lookup task failed: {}", e);
            Err(FetchError::Task(e.to_string()))
        }
    }
}
