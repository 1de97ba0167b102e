//! Period clipping

use crate::config::Period;
use crate::series::TimeSeries;
use chrono::NaiveDate;

/// Keep readings with `start <= date <= end`
///
/// An inverted range yields an empty series rather than an error.
pub fn clip(series: &TimeSeries, start: NaiveDate, end: NaiveDate) -> TimeSeries {
    clip_to(series, &Period::new(start, end))
}

/// Clip to a configured [`Period`]
pub fn clip_to(series: &TimeSeries, period: &Period) -> TimeSeries {
    series
        .iter()
        .filter(|reading| period.contains(reading.date()))
        .copied()
        .collect()
}
