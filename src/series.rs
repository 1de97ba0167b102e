//! Time series containers for station rainfall data.
//!
//! A [`TimeSeries`] is an ordered list of daily readings where a missing
//! observation is an explicit `None`. Readings keep their insertion order;
//! the axis is not required to be sorted, gap-free or unique until the
//! cleaning stages have run.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One observation at one date
///
/// Fields are private so every reading passes through [`Reading::new`];
/// a stored value is never NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "ReadingRecord")]
pub struct Reading {
    date: NaiveDate,
    value: Option<f64>,
}

#[derive(Deserialize)]
struct ReadingRecord {
    date: NaiveDate,
    value: Option<f64>,
}

impl From<ReadingRecord> for Reading {
    fn from(record: ReadingRecord) -> Self {
        Reading::new(record.date, record.value)
    }
}

impl Reading {
    /// Create a reading, normalising NaN to missing
    pub fn new(date: NaiveDate, value: Option<f64>) -> Self {
        Self {
            date,
            value: value.filter(|v| !v.is_nan()),
        }
    }

    /// Create a missing reading
    pub fn missing(date: NaiveDate) -> Self {
        Self { date, value: None }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn is_missing(&self) -> bool {
        self.value.is_none()
    }

    /// Calendar (year, month) the reading belongs to
    pub fn year_month(&self) -> (i32, u32) {
        (self.date.year(), self.date.month())
    }
}

/// Ordered sequence of readings for one station or grid cell
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    readings: Vec<Reading>,
}

impl TimeSeries {
    pub fn new(readings: Vec<Reading>) -> Self {
        readings.into_iter().collect()
    }

    /// Build a series from parallel dates and raw floats, treating NaN as missing
    pub fn from_values(dates: &[NaiveDate], values: &[f64]) -> Self {
        let readings = dates
            .iter()
            .zip(values)
            .map(|(&date, &value)| Reading::new(date, Some(value)))
            .collect();
        Self { readings }
    }

    /// Build a daily series starting at `start` from optional values
    pub fn daily(start: NaiveDate, values: &[Option<f64>]) -> Self {
        let readings = start
            .iter_days()
            .zip(values)
            .map(|(date, &value)| Reading::new(date, value))
            .collect();
        Self { readings }
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn into_readings(self) -> Vec<Reading> {
        self.readings
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Reading> {
        self.readings.iter()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.readings.iter().map(|r| r.date).collect()
    }

    pub fn values(&self) -> Vec<Option<f64>> {
        self.readings.iter().map(|r| r.value).collect()
    }

    /// Present values only, in series order
    pub fn present_values(&self) -> Vec<f64> {
        self.readings.iter().filter_map(|r| r.value).collect()
    }

    pub fn missing_count(&self) -> usize {
        self.readings.iter().filter(|r| r.is_missing()).count()
    }

    pub fn present_count(&self) -> usize {
        self.len() - self.missing_count()
    }

    /// First value recorded at `date`, if the date is on the axis
    pub fn get(&self, date: NaiveDate) -> Option<Option<f64>> {
        self.readings
            .iter()
            .find(|r| r.date == date)
            .map(|r| r.value)
    }

    /// Earliest and latest dates on the axis
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.readings.iter().map(|r| r.date).min()?;
        let last = self.readings.iter().map(|r| r.date).max()?;
        Some((first, last))
    }
}

impl FromIterator<Reading> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = Reading>>(iter: I) -> Self {
        Self {
            readings: iter
                .into_iter()
                .map(|r| Reading::new(r.date, r.value))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a TimeSeries {
    type Item = &'a Reading;
    type IntoIter = std::slice::Iter<'a, Reading>;

    fn into_iter(self) -> Self::IntoIter {
        self.readings.iter()
    }
}

impl IntoIterator for TimeSeries {
    type Item = Reading;
    type IntoIter = std::vec::IntoIter<Reading>;

    fn into_iter(self) -> Self::IntoIter {
        self.readings.into_iter()
    }
}

/// Series from several stations, keyed by station code
///
/// Entries keep insertion order. A raw collection may hold the same code
/// more than once; see
/// [`remove_duplicate_keys`](crate::cleaning::deduplication::remove_duplicate_keys).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationSeriesCollection {
    entries: Vec<(String, TimeSeries)>,
}

impl StationSeriesCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<(String, TimeSeries)>) -> Self {
        Self { entries }
    }

    pub fn push(&mut self, code: impl Into<String>, series: TimeSeries) {
        self.entries.push((code.into(), series));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(String, TimeSeries)] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<(String, TimeSeries)> {
        self.entries
    }

    pub fn codes(&self) -> Vec<&str> {
        self.entries.iter().map(|(code, _)| code.as_str()).collect()
    }

    /// First series stored under `code`
    pub fn get(&self, code: &str) -> Option<&TimeSeries> {
        self.entries
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, series)| series)
    }

    /// Sorted union of every station's dates
    pub fn common_axis(&self) -> Vec<NaiveDate> {
        let axis: BTreeSet<NaiveDate> = self
            .entries
            .iter()
            .flat_map(|(_, series)| series.iter().map(|r| r.date))
            .collect();
        axis.into_iter().collect()
    }

    /// Align every station on the common axis, one column per station
    ///
    /// Dates a station does not cover are missing in its column. Stations
    /// are expected to have unique timestamps; the first reading wins otherwise.
    pub fn aligned(&self) -> (Vec<NaiveDate>, Vec<(String, Vec<Option<f64>>)>) {
        let axis = self.common_axis();
        let columns = self
            .entries
            .iter()
            .map(|(code, series)| {
                let mut by_date = std::collections::HashMap::with_capacity(series.len());
                for reading in series {
                    by_date.entry(reading.date).or_insert(reading.value);
                }
                let column = axis
                    .iter()
                    .map(|date| by_date.get(date).copied().flatten())
                    .collect();
                (code.clone(), column)
            })
            .collect();
        (axis, columns)
    }
}

impl FromIterator<(String, TimeSeries)> for StationSeriesCollection {
    fn from_iter<I: IntoIterator<Item = (String, TimeSeries)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_nan_becomes_missing() {
        let series = TimeSeries::from_values(
            &[date(2020, 1, 1), date(2020, 1, 2)],
            &[f64::NAN, 2.0],
        );
        assert_eq!(series.values(), vec![None, Some(2.0)]);
        assert_eq!(series.missing_count(), 1);
        assert_eq!(series.present_count(), 1);
    }

    #[test]
    fn test_daily_builds_consecutive_dates() {
        let series = TimeSeries::daily(date(2020, 2, 28), &[Some(1.0), None, Some(3.0)]);
        assert_eq!(
            series.dates(),
            vec![date(2020, 2, 28), date(2020, 2, 29), date(2020, 3, 1)]
        );
        assert_eq!(series.date_range(), Some((date(2020, 2, 28), date(2020, 3, 1))));
    }

    #[test]
    fn test_aligned_fills_gaps_with_missing() {
        let mut collection = StationSeriesCollection::new();
        collection.push("A", TimeSeries::daily(date(2020, 1, 1), &[Some(1.0), Some(2.0)]));
        collection.push("B", TimeSeries::daily(date(2020, 1, 2), &[Some(5.0), Some(6.0)]));

        let (axis, columns) = collection.aligned();
        assert_eq!(axis, vec![date(2020, 1, 1), date(2020, 1, 2), date(2020, 1, 3)]);
        assert_eq!(columns[0], ("A".to_string(), vec![Some(1.0), Some(2.0), None]));
        assert_eq!(columns[1], ("B".to_string(), vec![None, Some(5.0), Some(6.0)]));
    }

    #[test]
    fn test_reading_deserializes_through_constructor() {
        let reading: Reading =
            serde_json::from_str(r#"{"date":"2020-01-01","value":null}"#).unwrap();
        assert!(reading.is_missing());
        assert_eq!(reading.date(), date(2020, 1, 1));
    }

    #[test]
    fn test_collected_series_has_no_nan() {
        let series: TimeSeries = [Some(1.0), Some(f64::NAN), None]
            .into_iter()
            .zip(date(2020, 1, 1).iter_days())
            .map(|(value, day)| Reading::new(day, value))
            .collect();
        assert_eq!(series.values(), vec![Some(1.0), None, None]);
        assert!(series.present_values().iter().all(|v| !v.is_nan()));
    }

    #[test]
    fn test_get_returns_first_occurrence() {
        let series = TimeSeries::new(vec![
            Reading::new(date(2020, 1, 1), Some(1.0)),
            Reading::new(date(2020, 1, 1), Some(9.0)),
        ]);
        assert_eq!(series.get(date(2020, 1, 1)), Some(Some(1.0)));
        assert_eq!(series.get(date(2020, 1, 2)), None);
    }
}
