//! Duplicate resolution for station tables and time series
//!
//! Duplicates are resolved by position: the first occurrence of a station
//! code or a timestamp is kept, later ones are discarded, and the relative
//! order of everything that survives is preserved.

use crate::series::{StationSeriesCollection, TimeSeries};
use std::collections::HashSet;
use std::hash::Hash;
use tracing::debug;

/// Keep the first item for every key, preserving order
///
/// Works for any keyed list, e.g. station metadata loaded from the
/// watershed intersection step.
pub fn remove_duplicate_keys_by<T, K, F>(items: Vec<T>, mut key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: FnMut(&T) -> K,
{
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(key(item)))
        .collect()
}

/// Keep the first series stored under each station code
pub fn remove_duplicate_keys(collection: StationSeriesCollection) -> StationSeriesCollection {
    let input_count = collection.len();
    let entries = remove_duplicate_keys_by(collection.into_entries(), |(code, _)| code.clone());

    if entries.len() < input_count {
        debug!(
            "Removed {} duplicate station codes ({} remaining)",
            input_count - entries.len(),
            entries.len()
        );
    }

    StationSeriesCollection::from_entries(entries)
}

/// Keep the first reading recorded at each timestamp
pub fn remove_duplicate_timestamps(series: &TimeSeries) -> TimeSeries {
    let mut seen = HashSet::with_capacity(series.len());
    let deduplicated: TimeSeries = series
        .iter()
        .filter(|reading| seen.insert(reading.date()))
        .copied()
        .collect();

    if deduplicated.len() < series.len() {
        let (reduction, removed) = get_deduplication_metrics(series.len(), deduplicated.len());
        debug!(
            "Removed {} duplicate timestamps ({:.1}% of readings)",
            removed, reduction
        );
    }

    deduplicated
}

/// Get deduplication effectiveness metrics
///
/// # Returns
///
/// Tuple of (reduction_percentage, duplicates_removed)
pub fn get_deduplication_metrics(input_count: usize, output_count: usize) -> (f64, usize) {
    let duplicates_removed = input_count.saturating_sub(output_count);
    let reduction_percentage = if input_count > 0 {
        (duplicates_removed as f64 / input_count as f64) * 100.0
    } else {
        0.0
    };

    (reduction_percentage, duplicates_removed)
}
