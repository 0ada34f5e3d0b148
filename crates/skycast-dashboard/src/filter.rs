//! Client-side search over the catalog results.

use skycast_weather::WeatherRecord;

/// True when the search field is active and holds some text.
pub fn in_search_mode(is_active: bool, search_text: Option<&str>) -> bool {
    is_active && search_text.is_some_and(|t| !t.is_empty())
}

/// Records whose city name contains `search_text`, ignoring case, in input order.
///
/// Absent or empty text returns every record.
pub fn filter_records(records: &[WeatherRecord], search_text: Option<&str>) -> Vec<WeatherRecord> {
    let needle = match search_text {
        Some(text) if !text.is_empty() => text.to_lowercase(),
        _ => return records.to_vec(),
    };

    records
        .iter()
        .filter(|r| r.city_name_contains(&needle))
        .cloned()
        .collect()
}
