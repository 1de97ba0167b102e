//! Cleaning statistics and result structures
//!
//! Tracks how many readings each stage touched for one station and
//! bundles the cleaned series with its quality report.

use crate::models::QualityReport;
use crate::series::TimeSeries;

/// Per-stage counters for one run of the pipeline
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleaningStats {
    /// Readings in the raw series
    pub total_input: usize,
    /// Readings removed because their timestamp was already present
    pub duplicates_removed: usize,
    /// Present values nulled because they were negative
    pub negatives_nulled: usize,
    /// Present values nulled because they exceeded the rainfall ceiling
    pub outliers_nulled: usize,
    /// Calendar months dropped as unrepresentative
    pub months_dropped: usize,
    /// Readings removed together with those months
    pub readings_dropped: usize,
    /// Readings outside the clipping period
    pub clipped_out: usize,
    /// Readings in the cleaned series
    pub final_output: usize,
}

impl CleaningStats {
    pub fn new(total_input: usize) -> Self {
        Self {
            total_input,
            ..Default::default()
        }
    }

    /// Percentage of input readings kept on the axis
    pub fn retention_rate(&self) -> f64 {
        if self.total_input == 0 {
            100.0
        } else {
            (self.final_output as f64 / self.total_input as f64) * 100.0
        }
    }

    /// Values nulled by the sign and outlier filters
    pub fn values_nulled(&self) -> usize {
        self.negatives_nulled + self.outliers_nulled
    }

    /// Get summary of cleaning statistics
    pub fn summary(&self) -> String {
        format!(
            "Cleaning Summary: {} -> {} readings ({:.1}% kept) | \
             Duplicates: {} | Nulled: {} (negatives: {}, outliers: {}) | \
             Months dropped: {} ({} readings) | Clipped: {}",
            self.total_input,
            self.final_output,
            self.retention_rate(),
            self.duplicates_removed,
            self.values_nulled(),
            self.negatives_nulled,
            self.outliers_nulled,
            self.months_dropped,
            self.readings_dropped,
            self.clipped_out
        )
    }
}

/// Cleaned series for one station together with its quality metadata
#[derive(Debug, Clone)]
pub struct CleanedSeries {
    pub station_code: String,
    pub series: TimeSeries,
    pub report: QualityReport,
    pub stats: CleaningStats,
}

impl CleanedSeries {
    pub fn reading_count(&self) -> usize {
        self.series.len()
    }
}
