//! Monthly representativeness filtering
//!
//! A calendar month is representative when it holds at least `min_days`
//! present values. Months below the threshold are removed from the axis
//! entirely rather than nulled.

use crate::series::TimeSeries;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Present-value count for each (year, month) on the axis
///
/// Months whose readings are all missing appear with a count of zero;
/// months with no readings at all do not appear.
pub fn monthly_present_counts(series: &TimeSeries) -> BTreeMap<(i32, u32), usize> {
    let mut counts = BTreeMap::new();
    for reading in series {
        let count = counts.entry(reading.year_month()).or_insert(0);
        if !reading.is_missing() {
            *count += 1;
        }
    }
    counts
}

/// Months that fall short of `min_days` present values
pub fn unrepresentative_months(series: &TimeSeries, min_days: usize) -> BTreeSet<(i32, u32)> {
    monthly_present_counts(series)
        .into_iter()
        .filter(|&(_, count)| count < min_days)
        .map(|(month, _)| month)
        .collect()
}

/// Drop every reading of a month with fewer than `min_days` present values
///
/// Counts are taken once over the input before anything is removed, so
/// each month is judged independently. The comparison is strict: a month
/// with exactly `min_days` present values is kept.
pub fn drop_unrepresentative_months(series: &TimeSeries, min_days: usize) -> TimeSeries {
    let dropped = unrepresentative_months(series, min_days);
    if dropped.is_empty() {
        return series.clone();
    }

    debug!(
        "Dropping {} unrepresentative months (minimum {} days)",
        dropped.len(),
        min_days
    );

    series
        .iter()
        .filter(|reading| !dropped.contains(&reading.year_month()))
        .copied()
        .collect()
}
