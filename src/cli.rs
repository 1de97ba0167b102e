//! Command-line interface for basin quality control.

use crate::config::{OutputFormat, Period, ProcessingConfig, QualityControlConfig};
use crate::constants::{
    DEFAULT_BASIN_NAME, DEFAULT_DATE_COLUMN, DEFAULT_DATE_FORMAT, DEFAULT_MAX_DAILY_RAINFALL_MM,
    DEFAULT_MAX_FAILURE_FRACTION, DEFAULT_MIN_DAYS_PER_MONTH, DEFAULT_MIN_YEARS_OF_DATA,
    DEFAULT_VALUE_COLUMN,
};
use crate::error::{HidrometError, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

/// CLI arguments for the rainfall quality-control processor
///
/// Cleans every station series of a basin and writes the concatenated
/// table, a per-station quality report and the basin triage report.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "hidromet",
    version,
    about = "Quality control for daily rainfall gauge series of a river basin"
)]
pub struct Args {
    /// Directory with one CSV file per station
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Output directory (defaults to a `cleaned` directory next to the input)
    #[arg(short, long, value_name = "PATH")]
    pub output_dir: Option<PathBuf>,

    /// CSV listing the basin's stations (code, latitude, longitude)
    #[arg(long, value_name = "FILE")]
    pub stations: Option<PathBuf>,

    /// Basin name recorded in the basin report
    #[arg(long, default_value = DEFAULT_BASIN_NAME)]
    pub basin: String,

    /// First day of the analysis period (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", requires = "end")]
    pub start: Option<NaiveDate>,

    /// Last day of the analysis period (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", requires = "start")]
    pub end: Option<NaiveDate>,

    /// Daily rainfall above this value (mm) is treated as an outlier
    #[arg(long, value_name = "MM", default_value_t = DEFAULT_MAX_DAILY_RAINFALL_MM)]
    pub max_rainfall: f64,

    /// Months with fewer present days than this are dropped
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MIN_DAYS_PER_MONTH)]
    pub min_days: usize,

    /// Stations with fewer years of record are not representative
    #[arg(long, value_name = "YEARS", default_value_t = DEFAULT_MIN_YEARS_OF_DATA)]
    pub min_years: f64,

    /// Stations with a larger failure fraction are flagged
    #[arg(long, value_name = "FRACTION", default_value_t = DEFAULT_MAX_FAILURE_FRACTION)]
    pub max_failure: f64,

    /// Name of the date column in station files
    #[arg(long, default_value = DEFAULT_DATE_COLUMN)]
    pub date_column: String,

    /// Name of the rainfall column in station files
    #[arg(long, default_value = DEFAULT_VALUE_COLUMN)]
    pub value_column: String,

    /// chrono format of the date column
    #[arg(long, default_value = DEFAULT_DATE_FORMAT)]
    pub date_format: String,

    /// Output format of the concatenated table (parquet, csv)
    #[arg(long, default_value = "parquet")]
    pub format: String,

    /// Number of stations cleaned concurrently (defaults to CPU count)
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log warnings and errors, no progress bar
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Build the processing configuration from the arguments
    pub fn to_config(&self) -> Result<ProcessingConfig> {
        let mut quality = QualityControlConfig::default()
            .with_max_daily_rainfall(self.max_rainfall)
            .with_min_days_per_month(self.min_days)
            .with_min_years_of_data(self.min_years)
            .with_max_failure_fraction(self.max_failure);

        if let (Some(start), Some(end)) = (self.start, self.end) {
            if start > end {
                return Err(HidrometError::invalid_parameter(
                    "period",
                    format!("start {} is after end {}", start, end),
                ));
            }
            quality = quality.with_period(Period::new(start, end));
        }
        quality.validate()?;

        let output_format: OutputFormat = self.format.parse()?;

        let mut config = ProcessingConfig::default()
            .with_columns(&self.date_column, &self.value_column)
            .with_date_format(&self.date_format)
            .with_output_format(output_format)
            .with_basin_name(&self.basin)
            .with_quality(quality);

        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }

        debug!("Processing configuration: {:?}", config);
        Ok(config)
    }

    pub fn get_log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}

/// Set up structured logging to stderr
///
/// `RUST_LOG` overrides the level derived from `--verbose`/`--quiet`.
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hidromet={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        let mut argv = vec!["hidromet"];
        argv.extend_from_slice(args);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_match_quality_defaults() {
        let args = parse(&["data/iguacu"]);
        let config = args.to_config().unwrap();

        assert_eq!(config.quality, QualityControlConfig::default());
        assert_eq!(config.output_format, OutputFormat::Parquet);
        assert_eq!(config.date_column, "date");
        assert_eq!(args.get_log_level(), "info");
    }

    #[test]
    fn test_period_and_thresholds() {
        let args = parse(&[
            "data",
            "--start",
            "1980-01-01",
            "--end",
            "2010-12-31",
            "--max-rainfall",
            "250",
            "--min-days",
            "20",
            "--format",
            "csv",
            "--workers",
            "2",
        ]);
        let config = args.to_config().unwrap();

        let period = config.quality.period.unwrap();
        assert_eq!(period.start, NaiveDate::from_ymd_opt(1980, 1, 1).unwrap());
        assert_eq!(period.end, NaiveDate::from_ymd_opt(2010, 12, 31).unwrap());
        assert_eq!(config.quality.max_daily_rainfall_mm, 250.0);
        assert_eq!(config.quality.min_days_per_month, 20);
        assert_eq!(config.output_format, OutputFormat::Csv);
        assert_eq!(config.workers, 2);
    }

    #[test]
    fn test_start_requires_end() {
        let result = Args::try_parse_from(["hidromet", "data", "--start", "1980-01-01"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_reversed_period_rejected() {
        let args = parse(&["data", "--start", "2000-01-01", "--end", "1999-01-01"]);
        assert!(matches!(
            args.to_config(),
            Err(HidrometError::InvalidParameter { name: "period", .. })
        ));
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        assert!(parse(&["data", "--max-failure", "1.5"]).to_config().is_err());
        assert!(parse(&["data", "--min-days", "40"]).to_config().is_err());
        assert!(parse(&["data", "--format", "xlsx"]).to_config().is_err());
    }

    #[test]
    fn test_log_levels() {
        assert_eq!(parse(&["data", "-v"]).get_log_level(), "debug");
        assert_eq!(parse(&["data", "-q"]).get_log_level(), "warn");
        assert!(Args::try_parse_from(["hidromet", "data", "-v", "-q"]).is_err());
    }
}
