//! Value filters that null out implausible observations
//!
//! Both filters replace offending values with the missing marker and never
//! touch the time axis, so the output always has the same length and the
//! same dates as the input. Because they only ever null values, applying
//! them in either order gives the same result.

use crate::error::{HidrometError, Result};
use crate::series::{Reading, TimeSeries};

/// Null every present value strictly greater than `limit`
///
/// Missing values stay missing. `limit` must be a non-negative finite
/// number (a rainfall ceiling in mm/day).
pub fn null_above(series: &TimeSeries, limit: f64) -> Result<TimeSeries> {
    if !limit.is_finite() || limit < 0.0 {
        return Err(HidrometError::invalid_parameter(
            "limit",
            format!("must be a non-negative finite number, got {}", limit),
        ));
    }

    Ok(series
        .iter()
        .map(|reading| match reading.value() {
            Some(value) if value > limit => Reading::missing(reading.date()),
            _ => *reading,
        })
        .collect())
}

/// Null every present value below zero
pub fn null_negative(series: &TimeSeries) -> TimeSeries {
    series
        .iter()
        .map(|reading| match reading.value() {
            Some(value) if value < 0.0 => Reading::missing(reading.date()),
            _ => *reading,
        })
        .collect()
}
