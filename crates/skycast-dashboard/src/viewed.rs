//! Read access to the user's recently viewed city names.
//!
//! Names are written by the search screen, not by this crate. They are stored as
//! a JSON object whose [`VIEWED_CITIES_KEY`] entry holds the ordered name list.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use skycast_core::StorageError;

/// Key under which the viewed city names are stored.
pub const VIEWED_CITIES_KEY: &str = "cityViewed";

/// Word separator the weather API expects in city queries.
const QUERY_SEPARATOR: &str = "+";

/// Source of the recently viewed city names, most recent last.
pub trait ViewedCityStore: Send + Sync {
    fn viewed_city_names(&self) -> Result<Vec<String>, StorageError>;
}

/// Viewed cities read from a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonViewedCityStore {
    path: PathBuf,
}

impl JsonViewedCityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ViewedCityStore for JsonViewedCityStore {
    /// A missing file or key means nothing has been viewed yet.
    fn viewed_city_names(&self) -> Result<Vec<String>, StorageError> {
        if !self.path.exists() {
            tracing::debug!("No viewed cities file at {}", self.path.display());
            return Ok(Vec::new());
        }

        let contents =
            std::fs::read_to_string(&self.path).map_err(|e| StorageError::ReadFailed {
                path: self.path.display().to_string(),
                message: e.to_string(),
            })?;

        let mut entries: HashMap<String, serde_json::Value> = serde_json::from_str(&contents)
            .map_err(|e| StorageError::Malformed(e.to_string()))?;

        match entries.remove(VIEWED_CITIES_KEY) {
            Some(value) => serde_json::from_value(value).map_err(|e| {
                StorageError::Malformed(format!("{} is not a list of names: {}", VIEWED_CITIES_KEY, e))
            }),
            None => Ok(Vec::new()),
        }
    }
}

/// Fixed in-memory list of viewed cities.
#[derive(Debug, Clone, Default)]
pub struct StaticViewedCities(Vec<String>);

impl StaticViewedCities {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }
}

impl ViewedCityStore for StaticViewedCities {
    fn viewed_city_names(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.0.clone())
    }
}

/// Turn a stored city name into a query for the weather API.
///
/// Returns `None` for blank names. Surrounding whitespace is dropped and each
/// remaining space becomes `+`: "New York" -> "New+York".
pub fn normalize_city_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.replace(' ', QUERY_SEPARATOR))
}
