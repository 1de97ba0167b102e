//! Configuration management and validation.
//!
//! Provides the quality-control thresholds used by the cleaning pipeline
//! and the settings of the batch processor (input layout, output format,
//! concurrency).

use crate::constants::{
    DEFAULT_BASIN_NAME, DEFAULT_DATE_COLUMN, DEFAULT_DATE_FORMAT, DEFAULT_MAX_DAILY_RAINFALL_MM,
    DEFAULT_MAX_FAILURE_FRACTION, DEFAULT_MIN_DAYS_PER_MONTH, DEFAULT_MIN_YEARS_OF_DATA,
    DEFAULT_VALUE_COLUMN, MAX_DAYS_PER_MONTH, STATION_FILE_PATTERN,
};
use crate::error::{HidrometError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// Inclusive date range used by the period clipper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Thresholds for the quality-control pipeline and station triage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityControlConfig {
    /// Values above this are nulled as outliers (mm/day)
    pub max_daily_rainfall_mm: f64,

    /// Months with fewer present values are dropped
    pub min_days_per_month: usize,

    /// Stations with fewer usable years are not representative
    pub min_years_of_data: f64,

    /// Stations with a larger missing fraction are flagged
    pub max_failure_fraction: f64,

    /// Optional period the cleaned series are clipped to
    pub period: Option<Period>,
}

impl Default for QualityControlConfig {
    fn default() -> Self {
        Self {
            max_daily_rainfall_mm: DEFAULT_MAX_DAILY_RAINFALL_MM,
            min_days_per_month: DEFAULT_MIN_DAYS_PER_MONTH,
            min_years_of_data: DEFAULT_MIN_YEARS_OF_DATA,
            max_failure_fraction: DEFAULT_MAX_FAILURE_FRACTION,
            period: None,
        }
    }
}

impl QualityControlConfig {
    pub fn with_max_daily_rainfall(mut self, limit_mm: f64) -> Self {
        self.max_daily_rainfall_mm = limit_mm;
        self
    }

    pub fn with_min_days_per_month(mut self, min_days: usize) -> Self {
        self.min_days_per_month = min_days;
        self
    }

    pub fn with_min_years_of_data(mut self, min_years: f64) -> Self {
        self.min_years_of_data = min_years;
        self
    }

    pub fn with_max_failure_fraction(mut self, fraction: f64) -> Self {
        self.max_failure_fraction = fraction;
        self
    }

    pub fn with_period(mut self, period: Period) -> Self {
        self.period = Some(period);
        self
    }

    /// Reject thresholds that would make the pipeline produce nonsense
    pub fn validate(&self) -> Result<()> {
        if !self.max_daily_rainfall_mm.is_finite() || self.max_daily_rainfall_mm < 0.0 {
            return Err(HidrometError::invalid_parameter(
                "max_daily_rainfall_mm",
                format!(
                    "must be a non-negative finite number, got {}",
                    self.max_daily_rainfall_mm
                ),
            ));
        }

        if self.min_days_per_month > MAX_DAYS_PER_MONTH {
            return Err(HidrometError::invalid_parameter(
                "min_days_per_month",
                format!(
                    "no month has more than {} days, got {}",
                    MAX_DAYS_PER_MONTH, self.min_days_per_month
                ),
            ));
        }

        if !self.min_years_of_data.is_finite() || self.min_years_of_data < 0.0 {
            return Err(HidrometError::invalid_parameter(
                "min_years_of_data",
                format!(
                    "must be a non-negative finite number, got {}",
                    self.min_years_of_data
                ),
            ));
        }

        if !(0.0..=1.0).contains(&self.max_failure_fraction) {
            return Err(HidrometError::invalid_parameter(
                "max_failure_fraction",
                format!("must lie in [0, 1], got {}", self.max_failure_fraction),
            ));
        }

        debug!("Quality control configuration validated: {:?}", self);
        Ok(())
    }
}

/// Output format of the concatenated series table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Parquet,
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Parquet => "parquet",
            OutputFormat::Csv => "csv",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = HidrometError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "parquet" => Ok(OutputFormat::Parquet),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(HidrometError::invalid_parameter(
                "format",
                format!("expected `parquet` or `csv`, got `{}`", other),
            )),
        }
    }
}

/// Global configuration for batch processing of a basin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Number of stations cleaned concurrently
    pub workers: usize,

    /// Glob pattern for station files inside the input directory
    pub file_pattern: String,

    /// Name of the date column in station files
    pub date_column: String,

    /// Name of the rainfall column in station files
    pub value_column: String,

    /// chrono format of the date column
    pub date_format: String,

    /// Format of the concatenated series table
    pub output_format: OutputFormat,

    /// Basin name recorded in the basin report
    pub basin_name: String,

    /// Quality-control thresholds
    pub quality: QualityControlConfig,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get().max(1),
            file_pattern: STATION_FILE_PATTERN.to_string(),
            date_column: DEFAULT_DATE_COLUMN.to_string(),
            value_column: DEFAULT_VALUE_COLUMN.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            output_format: OutputFormat::Parquet,
            basin_name: DEFAULT_BASIN_NAME.to_string(),
            quality: QualityControlConfig::default(),
        }
    }
}

impl ProcessingConfig {
    /// Create configuration with custom worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_columns(mut self, date_column: &str, value_column: &str) -> Self {
        self.date_column = date_column.to_string();
        self.value_column = value_column.to_string();
        self
    }

    pub fn with_date_format(mut self, date_format: &str) -> Self {
        self.date_format = date_format.to_string();
        self
    }

    pub fn with_output_format(mut self, output_format: OutputFormat) -> Self {
        self.output_format = output_format;
        self
    }

    pub fn with_basin_name(mut self, basin_name: &str) -> Self {
        self.basin_name = basin_name.to_string();
        self
    }

    pub fn with_quality(mut self, quality: QualityControlConfig) -> Self {
        self.quality = quality;
        self
    }
}
