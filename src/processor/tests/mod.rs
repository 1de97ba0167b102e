//! Tests for the batch processor module
//!
//! Builds small basin directories of station CSV files in temporary
//! directories and runs discovery, loading, writing and the full processor
//! over them.


use chrono::{Duration, NaiveDate};
use std::fs;
use std::path::{Path, PathBuf};

/// Write a station file with a `date,value` header and the given rows
pub fn write_station_file(dir: &Path, name: &str, rows: &[(&str, &str)]) -> PathBuf {
    let mut content = String::from("date,value\n");
    for (date, value) in rows {
        content.push_str(&format!("{},{}\n", date, value));
    }
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Write `days` consecutive daily readings of `value` starting at `start`
pub fn write_daily_station(
    dir: &Path,
    name: &str,
    start: NaiveDate,
    days: i64,
    value: &str,
) -> PathBuf {
    let mut content = String::from("date,value\n");
    for offset in 0..days {
        let date = start + Duration::days(offset);
        content.push_str(&format!("{},{}\n", date.format("%Y-%m-%d"), value));
    }
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
