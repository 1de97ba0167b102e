//! Tests for the cleaning stages
//!
//! Unit tests for each stage plus pipeline-level ordering tests.

pub mod value_filter_tests;

// Test helper functions and fixtures
use crate::series::{Reading, TimeSeries};
use chrono::{Datelike, NaiveDate};

/// Shorthand for a calendar date
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Daily series from optional values starting at `start`
pub fn daily_series(start: NaiveDate, values: &[Option<f64>]) -> TimeSeries {
    TimeSeries::daily(start, values)
}

/// Every day of one calendar month with `present` leading present values
/// and the remainder missing
pub fn month_with_present_days(year: i32, month: u32, present: usize) -> TimeSeries {
    let start = date(year, month, 1);
    start
        .iter_days()
        .take_while(|d| d.month() == month)
        .enumerate()
        .map(|(i, d)| Reading::new(d, if i < present { Some(1.0) } else { None }))
        .collect()
}

/// Fully present daily series covering `months` consecutive months from January of `year`
pub fn full_months(year: i32, months: u32) -> TimeSeries {
    let start = date(year, 1, 1);
    let end = start
        .checked_add_months(chrono::Months::new(months))
        .unwrap();
    start
        .iter_days()
        .take_while(|d| *d < end)
        .map(|d| Reading::new(d, Some(2.5)))
        .collect()
}

/// Concatenate series in order
pub fn concat(parts: Vec<TimeSeries>) -> TimeSeries {
    parts.into_iter().flat_map(|s| s.into_readings()).collect()
}
