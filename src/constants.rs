//! Application constants for the rainfall quality-control pipeline
//!
//! Default thresholds and naming conventions shared by the cleaning
//! stages, the batch processor and the command line.

// =============================================================================
// Quality Control Defaults
// =============================================================================

/// Maximum plausible daily rainfall in millimetres; larger values are outliers
pub const DEFAULT_MAX_DAILY_RAINFALL_MM: f64 = 400.0;

/// Minimum number of present daily values for a month to be representative
pub const DEFAULT_MIN_DAYS_PER_MONTH: usize = 15;

/// Minimum years of usable monthly data for a station to be kept
pub const DEFAULT_MIN_YEARS_OF_DATA: f64 = 5.0;

/// Maximum tolerated fraction of missing readings for a station
pub const DEFAULT_MAX_FAILURE_FRACTION: f64 = 0.25;

/// Months per year, used to convert usable months into years of record
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Longest calendar month; a larger per-month minimum can never be met by daily data
pub const MAX_DAYS_PER_MONTH: usize = 31;

// =============================================================================
// Input Conventions
// =============================================================================

/// Default name of the date column in station CSV files
pub const DEFAULT_DATE_COLUMN: &str = "date";

/// Default name of the rainfall column in station CSV files
pub const DEFAULT_VALUE_COLUMN: &str = "value";

/// Default chrono format of the date column
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Glob pattern for station files inside the input directory
pub const STATION_FILE_PATTERN: &str = "*.csv";

/// Column names of the station list produced by the watershed intersection step
pub mod station_columns {
    pub const CODE: &str = "code";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
}

// =============================================================================
// Output Conventions
// =============================================================================

/// Base name of the side-by-side table of cleaned series
pub const CONCATENATED_SERIES_NAME: &str = "concatenated_series";

/// File name of the per-station quality report
pub const QUALITY_REPORT_FILE: &str = "quality_report.csv";

/// File name of the basin triage report
pub const BASIN_REPORT_FILE: &str = "basin_report.json";

/// Default basin name when none is supplied
pub const DEFAULT_BASIN_NAME: &str = "basin";
