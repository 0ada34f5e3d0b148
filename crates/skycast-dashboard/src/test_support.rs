//! Fakes shared by the dashboard unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use skycast_weather::{
    CurrentConditions, FetchError, WeatherCondition, WeatherFetch, WeatherRecord,
};

use crate::listener::DashboardListener;

pub(crate) fn record(city_name: &str) -> WeatherRecord {
    WeatherRecord {
        city_name: city_name.to_string(),
        query_type: "City".to_string(),
        current: CurrentConditions {
            temperature_c: 18.0,
            temperature_f: 64.0,
            feels_like_c: 17.0,
            feels_like_f: 63.0,
            humidity: Some(55),
            wind_speed_kmph: Some(12.0),
            weather_code: 113,
            condition: WeatherCondition::Clear,
            description: "Sunny".to_string(),
            observation_time: "12:00 PM".to_string(),
        },
        fetched_at: Utc::now(),
    }
}

enum Outcome {
    Record(WeatherRecord),
    Fail(FetchError),
    Panic,
}

struct Scripted {
    delay: Duration,
    outcome: Outcome,
}

/// Fetcher answering from a script. Unknown cities fail with `CityNotFound`.
#[derive(Default)]
pub(crate) struct MockFetcher {
    script: HashMap<String, Scripted>,
    calls: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Answer `query` after `delay_ms` with a record named after the query.
    pub(crate) fn city(self, query: &str, delay_ms: u64) -> Self {
        let name = query.replace('+', " ");
        self.script_query(query, delay_ms, Outcome::Record(record(&name)))
    }

    pub(crate) fn failing(self, query: &str, delay_ms: u64, error: FetchError) -> Self {
        self.script_query(query, delay_ms, Outcome::Fail(error))
    }

    pub(crate) fn panicking(self, query: &str) -> Self {
        self.script_query(query, 0, Outcome::Panic)
    }

    fn script_query(mut self, query: &str, delay_ms: u64, outcome: Outcome) -> Self {
        self.script.insert(
            query.to_string(),
            Scripted {
                delay: Duration::from_millis(delay_ms),
                outcome,
            },
        );
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        let mut calls = self.calls.lock().clone();
        calls.sort();
        calls
    }
}

#[async_trait]
impl WeatherFetch for MockFetcher {
    async fn fetch(&self, city: &str) -> Result<WeatherRecord, FetchError> {
        self.calls.lock().push(city.to_string());

        let Some(scripted) = self.script.get(city) else {
            return Err(FetchError::CityNotFound(city.to_string()));
        };

        if !scripted.delay.is_zero() {
            tokio::time::sleep(scripted.delay).await;
        }

        match &scripted.outcome {
            Outcome::Record(record) => Ok(record.clone()),
            Outcome::Fail(error) => Err(error.clone()),
            Outcome::Panic => panic!("scripted fetch panic for {}", city),
        }
    }
}

/// Listener that counts updates and keeps every error.
#[derive(Default)]
pub(crate) struct RecordingListener {
    updates: AtomicUsize,
    errors: Mutex<Vec<FetchError>>,
}

impl RecordingListener {
    pub(crate) fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub(crate) fn errors(&self) -> Vec<FetchError> {
        self.errors.lock().clone()
    }
}

impl DashboardListener for RecordingListener {
    fn on_dashboard_updated(&self) {
        self.updates.fetch_add(1, Ordering::SeqCst);
    }

    fn on_error(&self, error: &FetchError) {
        self.errors.lock().push(error.clone());
    }
}
