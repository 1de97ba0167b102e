//! Coverage accounting: missing-data fraction and usable years of record

use crate::constants::MONTHS_PER_YEAR;
use crate::error::{HidrometError, Result};
use crate::series::TimeSeries;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mean of the present values of one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyMean {
    pub year: i32,
    pub month: u32,
    /// `None` when every reading of the month is missing
    pub mean: Option<f64>,
}

/// Fraction of readings that are missing, in [0, 1]
///
/// An empty series has no defined failure fraction and yields
/// [`HidrometError::EmptySeries`], so "no data" is never confused with
/// "no failures".
pub fn failure_fraction(series: &TimeSeries) -> Result<f64> {
    if series.is_empty() {
        return Err(HidrometError::EmptySeries {
            operation: "failure fraction",
        });
    }

    Ok(series.missing_count() as f64 / series.len() as f64)
}

/// Resample to calendar months, sorted by (year, month)
pub fn monthly_means(series: &TimeSeries) -> Vec<MonthlyMean> {
    let mut sums: BTreeMap<(i32, u32), (f64, usize)> = BTreeMap::new();
    for reading in series {
        let entry = sums.entry(reading.year_month()).or_insert((0.0, 0));
        if let Some(value) = reading.value() {
            entry.0 += value;
            entry.1 += 1;
        }
    }

    sums.into_iter()
        .map(|((year, month), (sum, count))| MonthlyMean {
            year,
            month,
            mean: (count > 0).then(|| sum / count as f64),
        })
        .collect()
}

/// Years of usable data: months with a defined mean, divided by twelve
///
/// Months need not be consecutive. An empty series has 0.0 years.
pub fn years_available(series: &TimeSeries) -> f64 {
    let usable_months = monthly_means(series)
        .iter()
        .filter(|m| m.mean.is_some())
        .count();
    usable_months as f64 / MONTHS_PER_YEAR
}

/// Quantile `p` of the present values, linearly interpolated
pub fn percentile(series: &TimeSeries, p: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&p) {
        return Err(HidrometError::invalid_parameter(
            "p",
            format!("must lie in [0, 1], got {}", p),
        ));
    }

    let mut values = series.present_values();
    if values.is_empty() {
        return Err(HidrometError::EmptySeries {
            operation: "percentile",
        });
    }
    values.sort_by(f64::total_cmp);

    let position = p * (values.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;

    Ok(values[lower] + (values[upper] - values[lower]) * weight)
}
