//! End-to-end tests of the cleaning pipeline and basin triage through the
//! public API.

use chrono::NaiveDate;
use hidromet::cleaning::percentile;
use hidromet::{
    BasinProcessor, BasinReport, OutputFormat, Period, ProcessingConfig, QualityControlConfig,
    QualityPipeline, Station, StationSeriesCollection, StationStatus, TimeSeries,
};
use std::fs;
use tempfile::TempDir;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Daily series over whole years with every `gap_every`-th day missing
fn station_years(first_year: i32, years: i32, gap_every: usize) -> TimeSeries {
    let start = date(first_year, 1, 1);
    let end = date(first_year + years, 1, 1);
    let days = (end - start).num_days() as usize;
    let values: Vec<Option<f64>> = (0..days)
        .map(|i| {
            if gap_every > 0 && i % gap_every == 0 {
                None
            } else {
                Some((i % 7) as f64)
            }
        })
        .collect();
    TimeSeries::daily(start, &values)
}

#[test]
fn test_basin_triage_from_collection() {
    let mut collection = StationSeriesCollection::new();
    collection.push("A", station_years(1990, 10, 0));
    // Every other day missing: fails the default 25% failure limit
    collection.push("B", station_years(1990, 10, 2));
    collection.push("C", station_years(1990, 2, 0));
    collection.push("D", TimeSeries::default());
    // Repeated code keeps the first series
    collection.push("A", TimeSeries::default());

    let pipeline = QualityPipeline::new(QualityControlConfig::default()).unwrap();
    let cleaned = pipeline.run_collection(collection).unwrap();

    let statuses: Vec<(&str, StationStatus)> = cleaned
        .iter()
        .map(|c| (c.station_code.as_str(), c.report.status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("A", StationStatus::Ok),
            ("B", StationStatus::TooManyFailures),
            ("C", StationStatus::NotRepresentative),
            ("D", StationStatus::EmptySeries),
        ]
    );

    let reports: Vec<_> = cleaned.iter().map(|c| c.report.clone()).collect();
    let basin = BasinReport::from_reports(
        "tibagi",
        &reports,
        &[Station::with_location("A", -24.3, -50.6)],
    );
    assert_eq!(basin.n_stations, 4);
    assert_eq!(basin.stations_ok[0].latitude, Some(-24.3));
    assert_eq!(basin.ok_fraction(), 0.25);
}

#[test]
fn test_coverage_reported_before_clipping() {
    let config = QualityControlConfig::default()
        .with_period(Period::new(date(1995, 1, 1), date(1995, 12, 31)));
    let pipeline = QualityPipeline::new(config).unwrap();

    let cleaned = pipeline.run("A", &station_years(1990, 10, 0)).unwrap();

    assert_eq!(cleaned.series.len(), 365);
    assert_eq!(cleaned.report.years_available, 10.0);
    assert_eq!(cleaned.report.status, StationStatus::Ok);
    assert!(cleaned.stats.clipped_out > 0);
}

#[test]
fn test_percentile_of_cleaned_series() {
    let pipeline = QualityPipeline::new(QualityControlConfig::default()).unwrap();
    let cleaned = pipeline.run("A", &station_years(2000, 1, 0)).unwrap();

    assert_eq!(percentile(&cleaned.series, 0.0).unwrap(), 0.0);
    assert_eq!(percentile(&cleaned.series, 1.0).unwrap(), 6.0);
    assert_eq!(percentile(&cleaned.series, 0.5).unwrap(), 3.0);
}

#[tokio::test]
async fn test_processor_end_to_end_csv() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("series");
    let output = temp_dir.path().join("cleaned");
    fs::create_dir_all(&input).unwrap();

    for (code, series) in [
        ("02549001", station_years(2000, 6, 0)),
        ("02549002", station_years(2000, 1, 0)),
    ] {
        let mut content = String::from("date,value\n");
        for reading in series.iter() {
            let value = reading.value().map(|v| v.to_string()).unwrap_or_default();
            content.push_str(&format!("{},{}\n", reading.date().format("%Y-%m-%d"), value));
        }
        fs::write(input.join(format!("posto_{}.csv", code)), content).unwrap();
    }

    let config = ProcessingConfig::default()
        .with_output_format(OutputFormat::Csv)
        .with_basin_name("iguacu");
    let stats = BasinProcessor::new(input, Some(output.clone()))
        .unwrap()
        .with_config(config)
        .with_progress(false)
        .process()
        .await
        .unwrap();

    assert_eq!(stats.stations_processed, 2);

    let table = fs::read_to_string(output.join("concatenated_series.csv")).unwrap();
    assert!(table.starts_with("date,02549001,02549002\n"));

    let report = fs::read_to_string(output.join("quality_report.csv")).unwrap();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("code,"));
    assert!(lines[1].starts_with("02549001,"));
    assert!(lines[1].ends_with(",ok"));
    assert!(lines[2].ends_with(",not_representative"));
}
