//! Tests for the sign and outlier filters

use super::*;
use crate::cleaning::value_filters::{null_above, null_negative};
use crate::error::HidrometError;

fn scenario_series() -> TimeSeries {
    daily_series(
        date(2021, 3, 1),
        &[Some(1.0), Some(-2.0), Some(500.0), Some(f64::NAN), Some(3.0)],
    )
}

#[test]
fn test_sign_then_outlier_scenario() {
    let series = scenario_series();

    let result = null_above(&null_negative(&series), 400.0).unwrap();

    assert_eq!(result.values(), vec![Some(1.0), None, None, None, Some(3.0)]);
    assert_eq!(result.dates(), series.dates());
}

#[test]
fn test_filters_commute() {
    let series = scenario_series();

    let sign_first = null_above(&null_negative(&series), 400.0).unwrap();
    let outlier_first = null_negative(&null_above(&series, 400.0).unwrap());

    assert_eq!(sign_first, outlier_first);
}

#[test]
fn test_null_above_is_strict() {
    let series = daily_series(date(2021, 1, 1), &[Some(400.0), Some(400.1)]);

    let result = null_above(&series, 400.0).unwrap();

    assert_eq!(result.values(), vec![Some(400.0), None]);
}

#[test]
fn test_null_above_leaves_missing_untouched() {
    let series = daily_series(date(2021, 1, 1), &[None, None]);

    let result = null_above(&series, 10.0).unwrap();

    assert_eq!(result, series);
}

#[test]
fn test_null_above_rejects_invalid_limits() {
    let series = scenario_series();

    for limit in [-1.0, f64::NAN, f64::INFINITY] {
        let err = null_above(&series, limit).unwrap_err();
        assert!(matches!(
            err,
            HidrometError::InvalidParameter { name: "limit", .. }
        ));
    }
}

#[test]
fn test_null_negative_keeps_zero() {
    let series = daily_series(date(2021, 1, 1), &[Some(0.0), Some(-0.1), None]);

    let result = null_negative(&series);

    assert_eq!(result.values(), vec![Some(0.0), None, None]);
}

#[test]
fn test_filters_preserve_length_on_empty_series() {
    let empty = TimeSeries::default();
    assert!(null_negative(&empty).is_empty());
    assert!(null_above(&empty, 400.0).unwrap().is_empty());
}

#[test]
fn test_each_filter_nulls_one_scenario_value() {
    let series = scenario_series();
    // NaN was normalised to missing before either filter runs
    assert_eq!(series.missing_count(), 1);

    let non_negative = null_negative(&series);
    assert_eq!(non_negative.missing_count(), 2);
    assert_eq!(null_above(&non_negative, 400.0).unwrap().missing_count(), 3);
}
