//! Output writing for cleaned basins
//!
//! Writes the side-by-side table of cleaned series (Parquet or CSV), the
//! per-station quality report (CSV) and the basin triage report (JSON).

use crate::basin::BasinReport;
use crate::config::OutputFormat;
use crate::constants::{BASIN_REPORT_FILE, CONCATENATED_SERIES_NAME, QUALITY_REPORT_FILE};
use crate::error::{HidrometError, Result};
use crate::models::QualityReport;
use crate::series::StationSeriesCollection;

use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

const DATE_OUTPUT_FORMAT: &str = "%Y-%m-%d";

/// Wide table: a `date` column on the union axis plus one column per station
pub fn concatenated_frame(collection: &StationSeriesCollection) -> Result<DataFrame> {
    let (axis, columns) = collection.aligned();

    let dates: Vec<String> = axis
        .iter()
        .map(|d| d.format(DATE_OUTPUT_FORMAT).to_string())
        .collect();

    let mut frame_columns = Vec::with_capacity(columns.len() + 1);
    frame_columns.push(Column::new("date".into(), dates));
    for (code, values) in columns {
        frame_columns.push(Column::new(code.as_str().into(), values));
    }

    Ok(DataFrame::new(frame_columns)?)
}

/// One row per station with its coverage figures and triage verdict
pub fn quality_report_frame(reports: &[QualityReport]) -> Result<DataFrame> {
    let codes: Vec<String> = reports.iter().map(|r| r.station_code.clone()).collect();
    let totals: Vec<u64> = reports.iter().map(|r| r.total_readings as u64).collect();
    let missing: Vec<u64> = reports.iter().map(|r| r.missing_readings as u64).collect();
    let failure_pct: Vec<Option<f64>> = reports.iter().map(|r| r.failure_percent()).collect();
    let years: Vec<f64> = reports.iter().map(|r| r.years_available).collect();
    let status: Vec<String> = reports.iter().map(|r| r.status.to_string()).collect();

    Ok(DataFrame::new(vec![
        Column::new("code".into(), codes),
        Column::new("total_readings".into(), totals),
        Column::new("missing_readings".into(), missing),
        Column::new("failure_pct".into(), failure_pct),
        Column::new("years_available".into(), years),
        Column::new("status".into(), status),
    ])?)
}

/// Writer for all outputs of one basin run
#[derive(Debug)]
pub struct OutputWriter {
    output_dir: PathBuf,
    format: OutputFormat,
}

impl OutputWriter {
    pub fn new(output_dir: PathBuf, format: OutputFormat) -> Self {
        Self { output_dir, format }
    }

    /// Path of the concatenated series table for the configured format
    pub fn concatenated_path(&self) -> PathBuf {
        self.output_dir.join(format!(
            "{}.{}",
            CONCATENATED_SERIES_NAME,
            self.format.extension()
        ))
    }

    /// Write the cleaned series side by side; returns the number of rows
    pub fn write_concatenated(&self, collection: &StationSeriesCollection) -> Result<usize> {
        let mut df = concatenated_frame(collection)?;
        let path = self.concatenated_path();

        match self.format {
            OutputFormat::Parquet => write_parquet(&path, &mut df)?,
            OutputFormat::Csv => write_csv(&path, &mut df)?,
        }

        debug!(
            "Wrote {} rows x {} stations to {}",
            df.height(),
            collection.len(),
            path.display()
        );
        Ok(df.height())
    }

    pub fn write_quality_report(&self, reports: &[QualityReport]) -> Result<PathBuf> {
        let mut df = quality_report_frame(reports)?;
        let path = self.output_dir.join(QUALITY_REPORT_FILE);
        write_csv(&path, &mut df)?;
        Ok(path)
    }

    pub fn write_basin_report(&self, report: &BasinReport) -> Result<PathBuf> {
        let path = self.output_dir.join(BASIN_REPORT_FILE);
        let file = File::create(&path)?;
        serde_json::to_writer_pretty(file, report)?;
        Ok(path)
    }
}

fn write_parquet(path: &Path, df: &mut DataFrame) -> Result<()> {
    let file = File::create(path)?;
    ParquetWriter::new(file)
        .with_compression(ParquetCompression::Snappy)
        .finish(df)
        .map_err(|e| HidrometError::ProcessingFailed {
            path: path.to_path_buf(),
            reason: format!("Failed to write parquet: {}", e),
        })?;
    Ok(())
}

fn write_csv(path: &Path, df: &mut DataFrame) -> Result<()> {
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .map_err(|e| HidrometError::ProcessingFailed {
            path: path.to_path_buf(),
            reason: format!("Failed to write csv: {}", e),
        })?;
    Ok(())
}
