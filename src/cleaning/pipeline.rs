//! Quality-control pipeline orchestration
//!
//! Runs the cleaning stages in their fixed order for one station:
//!
//! 1. duplicate timestamps removed (must precede the monthly counts)
//! 2. negative values nulled
//! 3. values above the rainfall ceiling nulled
//! 4. unrepresentative months dropped
//! 5. coverage accounted (read-only) and the station triaged
//! 6. optional clipping to the configured period

use crate::basin::classify;
use crate::config::QualityControlConfig;
use crate::error::{HidrometError, Result};
use crate::models::QualityReport;
use crate::series::{StationSeriesCollection, TimeSeries};
use tracing::{debug, info};

use super::{
    coverage::{failure_fraction, years_available},
    deduplication::{remove_duplicate_keys, remove_duplicate_timestamps},
    period::clip_to,
    representativeness::{drop_unrepresentative_months, unrepresentative_months},
    stats::{CleanedSeries, CleaningStats},
    value_filters::{null_above, null_negative},
};

/// Quality-control pipeline for station rainfall series
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use hidromet::cleaning::QualityPipeline;
/// use hidromet::config::QualityControlConfig;
/// use hidromet::series::TimeSeries;
///
/// # fn main() -> hidromet::Result<()> {
/// let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
/// let series = TimeSeries::daily(start, &[Some(1.0), Some(-2.0), Some(500.0), None, Some(3.0)]);
///
/// let pipeline = QualityPipeline::new(QualityControlConfig::default().with_min_days_per_month(0))?;
/// let cleaned = pipeline.run("02549001", &series)?;
///
/// assert_eq!(cleaned.series.values(), vec![Some(1.0), None, None, None, Some(3.0)]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct QualityPipeline {
    config: QualityControlConfig,
}

impl QualityPipeline {
    /// Create a pipeline, rejecting invalid thresholds up front
    pub fn new(config: QualityControlConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &QualityControlConfig {
        &self.config
    }

    /// Clean one station series and compute its quality report
    pub fn run(&self, station_code: &str, series: &TimeSeries) -> Result<CleanedSeries> {
        let mut stats = CleaningStats::new(series.len());

        // Step 1: Duplicate timestamps
        let deduplicated = remove_duplicate_timestamps(series);
        stats.duplicates_removed = series.len() - deduplicated.len();

        // Step 2: Sign filter
        let non_negative = null_negative(&deduplicated);
        stats.negatives_nulled = non_negative.missing_count() - deduplicated.missing_count();

        // Step 3: Outlier filter
        let bounded = null_above(&non_negative, self.config.max_daily_rainfall_mm)?;
        stats.outliers_nulled = bounded.missing_count() - non_negative.missing_count();

        // Step 4: Representativeness
        stats.months_dropped =
            unrepresentative_months(&bounded, self.config.min_days_per_month).len();
        let representative = drop_unrepresentative_months(&bounded, self.config.min_days_per_month);
        stats.readings_dropped = bounded.len() - representative.len();

        // Step 5: Coverage accounting on the unclipped series
        let report = self.build_report(station_code, &representative)?;

        // Step 6: Optional period clip
        let cleaned = match &self.config.period {
            Some(period) => clip_to(&representative, period),
            None => representative,
        };
        stats.clipped_out = stats.total_input
            - stats.duplicates_removed
            - stats.readings_dropped
            - cleaned.len();
        stats.final_output = cleaned.len();

        debug!("Station {}: {}", station_code, stats.summary());

        Ok(CleanedSeries {
            station_code: station_code.to_string(),
            series: cleaned,
            report,
            stats,
        })
    }

    /// Clean every station of a collection, resolving duplicate codes first
    pub fn run_collection(&self, collection: StationSeriesCollection) -> Result<Vec<CleanedSeries>> {
        let unique = remove_duplicate_keys(collection);
        info!("Cleaning {} station series", unique.len());

        unique
            .entries()
            .iter()
            .map(|(code, series)| self.run(code, series))
            .collect()
    }

    fn build_report(&self, station_code: &str, series: &TimeSeries) -> Result<QualityReport> {
        let failure = match failure_fraction(series) {
            Ok(fraction) => Some(fraction),
            Err(HidrometError::EmptySeries { .. }) => None,
            Err(e) => return Err(e),
        };
        let years = years_available(series);

        Ok(QualityReport {
            station_code: station_code.to_string(),
            total_readings: series.len(),
            missing_readings: series.missing_count(),
            failure_fraction: failure,
            years_available: years,
            status: classify(failure, years, &self.config),
        })
    }
}
