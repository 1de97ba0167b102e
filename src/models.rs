//! Core data structures shared across the library.
//!
//! Defines station metadata, per-station quality reports, triage
//! verdicts and batch processing statistics.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Rainfall gauge identified by a unique code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub code: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Station {
    /// Station known only by its code
    pub fn from_code(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            latitude: None,
            longitude: None,
        }
    }

    pub fn with_location(code: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            code: code.into(),
            latitude: Some(latitude),
            longitude: Some(longitude),
        }
    }
}

/// Triage verdict for one station after cleaning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StationStatus {
    /// No readings left to evaluate
    EmptySeries,
    /// Fewer years of usable monthly data than required
    NotRepresentative,
    /// Missing fraction above the tolerated limit
    TooManyFailures,
    Ok,
}

impl StationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StationStatus::EmptySeries => "empty_series",
            StationStatus::NotRepresentative => "not_representative",
            StationStatus::TooManyFailures => "too_many_failures",
            StationStatus::Ok => "ok",
        }
    }
}

impl fmt::Display for StationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived quality attributes of one cleaned series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub station_code: String,
    pub total_readings: usize,
    pub missing_readings: usize,
    /// Missing / total; `None` when the series has no readings
    pub failure_fraction: Option<f64>,
    /// Usable months divided by twelve
    pub years_available: f64,
    pub status: StationStatus,
}

impl QualityReport {
    /// Failure fraction as a whole percentage, the way the dashboard shows it
    pub fn failure_percent(&self) -> Option<f64> {
        self.failure_fraction
            .map(|fraction| (fraction * 100.0).round())
    }
}

/// Batch processing statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub stations_found: usize,
    pub stations_processed: usize,
    pub stations_failed: usize,
    pub total_readings: usize,
    pub output_dir: PathBuf,
    pub processing_time_ms: u128,
}

impl ProcessingStats {
    /// Percentage of discovered stations that went through the pipeline
    pub fn success_rate(&self) -> f64 {
        if self.stations_found == 0 {
            100.0
        } else {
            (self.stations_processed as f64 / self.stations_found as f64) * 100.0
        }
    }
}
