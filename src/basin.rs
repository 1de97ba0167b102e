//! Station triage for a river basin.
//!
//! Sorts stations into those with an empty series, those with too few
//! years of usable data, those with too many failures, and those fit for
//! analysis, and collects the verdicts into a [`BasinReport`]. Stations
//! whose file could not be read get a bucket of their own.

use crate::config::QualityControlConfig;
use crate::models::{QualityReport, Station, StationStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Triage one station from its coverage figures
///
/// Checks run in order: empty series, years of record below
/// `min_years_of_data`, failure fraction above `max_failure_fraction`.
pub fn classify(
    failure_fraction: Option<f64>,
    years_available: f64,
    config: &QualityControlConfig,
) -> StationStatus {
    let Some(failure) = failure_fraction else {
        return StationStatus::EmptySeries;
    };

    if years_available < config.min_years_of_data {
        StationStatus::NotRepresentative
    } else if failure > config.max_failure_fraction {
        StationStatus::TooManyFailures
    } else {
        StationStatus::Ok
    }
}

/// Stations of one basin grouped by triage verdict
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasinReport {
    pub basin: String,
    /// Every station considered, whatever its verdict
    pub n_stations: usize,
    pub empty_series: Vec<Station>,
    pub not_representative: Vec<Station>,
    pub with_failures: Vec<Station>,
    pub stations_ok: Vec<Station>,
    /// Stations whose series could not be loaded or cleaned
    #[serde(default)]
    pub failed: Vec<Station>,
}

impl BasinReport {
    pub fn new(basin: impl Into<String>) -> Self {
        Self {
            basin: basin.into(),
            ..Default::default()
        }
    }

    /// Build the report from quality reports, attaching known station locations
    ///
    /// Stations without metadata are recorded by code only.
    pub fn from_reports(
        basin: impl Into<String>,
        reports: &[QualityReport],
        stations: &[Station],
    ) -> Self {
        Self::from_outcomes(basin, reports, &[], &[], stations)
    }

    /// Build the report for a whole processing run
    ///
    /// `missing` holds listed stations that have no series file; they are
    /// triaged as empty series. `failed` holds stations whose file could not
    /// be loaded or cleaned. Both count towards `n_stations`.
    pub fn from_outcomes(
        basin: impl Into<String>,
        reports: &[QualityReport],
        missing: &[String],
        failed: &[String],
        stations: &[Station],
    ) -> Self {
        let by_code: HashMap<&str, &Station> =
            stations.iter().map(|s| (s.code.as_str(), s)).collect();
        let lookup = |code: &str| {
            by_code
                .get(code)
                .map(|s| (*s).clone())
                .unwrap_or_else(|| Station::from_code(code))
        };

        let mut report = Self::new(basin);
        for quality in reports {
            report.add(lookup(&quality.station_code), quality.status);
        }
        for code in missing {
            report.add(lookup(code), StationStatus::EmptySeries);
        }
        for code in failed {
            report.add_failed(lookup(code));
        }

        debug!(
            "Basin {} triage: {} ok, {} with failures, {} not representative, {} empty, {} failed",
            report.basin,
            report.stations_ok.len(),
            report.with_failures.len(),
            report.not_representative.len(),
            report.empty_series.len(),
            report.failed.len()
        );

        report
    }

    pub fn add(&mut self, station: Station, status: StationStatus) {
        self.n_stations += 1;
        match status {
            StationStatus::EmptySeries => self.empty_series.push(station),
            StationStatus::NotRepresentative => self.not_representative.push(station),
            StationStatus::TooManyFailures => self.with_failures.push(station),
            StationStatus::Ok => self.stations_ok.push(station),
        }
    }

    pub fn add_failed(&mut self, station: Station) {
        self.n_stations += 1;
        self.failed.push(station);
    }

    /// Fraction of stations fit for analysis
    pub fn ok_fraction(&self) -> f64 {
        if self.n_stations == 0 {
            0.0
        } else {
            self.stations_ok.len() as f64 / self.n_stations as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(code: &str, status: StationStatus) -> QualityReport {
        QualityReport {
            station_code: code.to_string(),
            total_readings: 10,
            missing_readings: 0,
            failure_fraction: Some(0.0),
            years_available: 10.0,
            status,
        }
    }

    #[test]
    fn test_classify_order() {
        let config = QualityControlConfig::default()
            .with_min_years_of_data(5.0)
            .with_max_failure_fraction(0.2);

        assert_eq!(classify(None, 0.0, &config), StationStatus::EmptySeries);
        // Too few years wins over too many failures
        assert_eq!(
            classify(Some(0.9), 1.0, &config),
            StationStatus::NotRepresentative
        );
        assert_eq!(
            classify(Some(0.3), 10.0, &config),
            StationStatus::TooManyFailures
        );
        assert_eq!(classify(Some(0.2), 5.0, &config), StationStatus::Ok);
    }

    #[test]
    fn test_from_reports_groups_and_attaches_locations() {
        let reports = vec![
            report("001", StationStatus::Ok),
            report("002", StationStatus::EmptySeries),
            report("003", StationStatus::TooManyFailures),
            report("004", StationStatus::Ok),
        ];
        let stations = vec![Station::with_location("001", -25.5, -49.3)];

        let basin = BasinReport::from_reports("iguacu", &reports, &stations);

        assert_eq!(basin.basin, "iguacu");
        assert_eq!(basin.n_stations, 4);
        assert_eq!(basin.stations_ok.len(), 2);
        assert_eq!(basin.stations_ok[0].latitude, Some(-25.5));
        assert_eq!(basin.stations_ok[1], Station::from_code("004"));
        assert_eq!(basin.empty_series.len(), 1);
        assert_eq!(basin.with_failures.len(), 1);
        assert!(basin.not_representative.is_empty());
        assert_eq!(basin.ok_fraction(), 0.5);
        assert!(basin.failed.is_empty());
    }

    #[test]
    fn test_from_outcomes_counts_missing_and_failed_stations() {
        let reports = vec![report("001", StationStatus::Ok)];
        let stations = vec![
            Station::from_code("001"),
            Station::with_location("002", -25.1, -49.9),
        ];

        let basin = BasinReport::from_outcomes(
            "iguacu",
            &reports,
            &["002".to_string()],
            &["003".to_string()],
            &stations,
        );

        assert_eq!(basin.n_stations, 3);
        assert_eq!(basin.empty_series, vec![Station::with_location("002", -25.1, -49.9)]);
        assert_eq!(basin.failed, vec![Station::from_code("003")]);
        assert!((basin.ok_fraction() - 1.0 / 3.0).abs() < 1e-12);
    }
}
