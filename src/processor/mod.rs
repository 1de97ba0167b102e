//! Batch processing of a basin's station files.
//!
//! Orchestrates the complete workflow: station file discovery, optional
//! restriction to the stations inside the watershed, concurrent cleaning
//! of each station, and writing of the cleaned table and reports.

pub mod discovery;
pub mod loader;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::{
    discovery::{FileDiscovery, StationFile},
    loader::{SeriesLayout, load_station_list, load_station_series},
    writer::OutputWriter,
};

use crate::basin::BasinReport;
use crate::cleaning::deduplication::remove_duplicate_keys_by;
use crate::cleaning::{CleanedSeries, QualityPipeline};
use crate::config::ProcessingConfig;
use crate::error::{HidrometError, Result};
use crate::models::{ProcessingStats, QualityReport, Station, StationStatus};
use crate::series::StationSeriesCollection;

use colored::*;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::fs;
use tokio::task;
use tracing::{debug, error, info, warn};

/// Main processor for cleaning every station of a basin
#[derive(Debug)]
pub struct BasinProcessor {
    input_dir: PathBuf,
    output_dir: PathBuf,
    station_list: Option<PathBuf>,
    config: ProcessingConfig,
    show_progress: bool,
}

impl BasinProcessor {
    /// Create a new basin processor
    ///
    /// Outputs default to a `cleaned` directory next to the input directory.
    pub fn new(input_dir: PathBuf, output_dir: Option<PathBuf>) -> Result<Self> {
        if !input_dir.is_dir() {
            return Err(HidrometError::DatasetNotFound { path: input_dir });
        }

        let output_dir = output_dir.unwrap_or_else(|| {
            input_dir
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."))
                .join("cleaned")
        });

        Ok(Self {
            input_dir,
            output_dir,
            station_list: None,
            config: ProcessingConfig::default(),
            show_progress: true,
        })
    }

    /// Configure the processor
    pub fn with_config(mut self, config: ProcessingConfig) -> Self {
        self.config = config;
        self
    }

    /// Only process stations listed in this CSV (code, latitude, longitude)
    pub fn with_station_list(mut self, path: PathBuf) -> Self {
        self.station_list = Some(path);
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn output_dir(&self) -> &PathBuf {
        &self.output_dir
    }

    /// Main processing entry point
    pub async fn process(&self) -> Result<ProcessingStats> {
        let start_time = Instant::now();
        let pipeline = QualityPipeline::new(self.config.quality.clone())?;

        println!("{}", "Starting basin quality control".bright_green().bold());
        println!("  {} {}", "Basin:".bright_cyan(), self.config.basin_name);
        println!("  {} {}", "Input:".bright_cyan(), self.input_dir.display());
        println!("  {} {}", "Output:".bright_cyan(), self.output_dir.display());

        // Step 1: Discover station files
        println!("\n{}", "Discovering station files...".bright_yellow());
        let discovery = FileDiscovery::new(self.input_dir.clone(), &self.config.file_pattern);
        let files = discovery.discover_station_files()?;
        println!(
            "  {} {} station files",
            "Found".bright_green(),
            files.len().to_string().bright_white().bold()
        );

        // Step 2: Restrict to the watershed's stations
        let stations = match &self.station_list {
            Some(path) => load_station_list(path)?,
            None => Vec::new(),
        };
        let (files, missing) = self.select_files(files, &stations);
        let files = remove_duplicate_keys_by(files, |f| f.code.clone());

        if files.is_empty() {
            warn!("No station files to process in {}", self.input_dir.display());
        }

        // Step 3: Clean every station concurrently
        println!("\n{}", "Cleaning station series...".bright_yellow());
        let (cleaned, failed) = self.clean_stations(&files, pipeline).await;

        // Step 4: Write outputs
        fs::create_dir_all(&self.output_dir).await?;
        let writer = OutputWriter::new(self.output_dir.clone(), self.config.output_format);

        let collection: StationSeriesCollection = cleaned
            .iter()
            .map(|c| (c.station_code.clone(), c.series.clone()))
            .collect();
        let reports: Vec<QualityReport> = cleaned.iter().map(|c| c.report.clone()).collect();
        let basin_report = BasinReport::from_outcomes(
            &self.config.basin_name,
            &reports,
            &missing,
            &failed,
            &stations,
        );
        let ok_fraction = basin_report.ok_fraction();

        let total_rows = task::spawn_blocking(move || -> Result<usize> {
            let rows = writer.write_concatenated(&collection)?;
            writer.write_quality_report(&reports)?;
            writer.write_basin_report(&basin_report)?;
            Ok(rows)
        })
        .await
        .map_err(|e| HidrometError::ProcessingFailed {
            path: self.output_dir.clone(),
            reason: format!("Output writer task failed: {}", e),
        })??;

        let stats = ProcessingStats {
            stations_found: files.len(),
            stations_processed: cleaned.len(),
            stations_failed: failed.len(),
            total_readings: cleaned.iter().map(CleanedSeries::reading_count).sum(),
            output_dir: self.output_dir.clone(),
            processing_time_ms: start_time.elapsed().as_millis(),
        };

        info!(
            "Basin processing complete: {} of {} stations cleaned, {} table rows",
            stats.stations_processed, stats.stations_found, total_rows
        );
        self.print_summary(&stats, &cleaned, ok_fraction);

        Ok(stats)
    }

    /// Keep only files of listed stations when a station list is given
    ///
    /// Also returns the listed codes that have no file, in list order.
    fn select_files(
        &self,
        files: Vec<StationFile>,
        stations: &[Station],
    ) -> (Vec<StationFile>, Vec<String>) {
        if self.station_list.is_none() {
            return (files, Vec::new());
        }

        let listed: HashSet<&str> = stations.iter().map(|s| s.code.as_str()).collect();
        let found: HashSet<&str> = files.iter().map(|f| f.code.as_str()).collect();
        let missing: Vec<String> = stations
            .iter()
            .filter(|s| !found.contains(s.code.as_str()))
            .map(|s| s.code.clone())
            .collect();
        for code in &missing {
            warn!("Listed station {} has no series file", code);
        }

        let selected: Vec<StationFile> = files
            .iter()
            .filter(|f| listed.contains(f.code.as_str()))
            .cloned()
            .collect();
        debug!(
            "Station list selects {} of {} files",
            selected.len(),
            files.len()
        );
        (selected, missing)
    }

    /// Load and clean each station on a blocking worker
    ///
    /// Returns cleaned stations and the codes that failed, both in discovery order.
    async fn clean_stations(
        &self,
        files: &[StationFile],
        pipeline: QualityPipeline,
    ) -> (Vec<CleanedSeries>, Vec<String>) {
        let pb = self.create_progress_bar(files.len() as u64);
        let pipeline = Arc::new(pipeline);
        let layout = Arc::new(SeriesLayout {
            date_column: self.config.date_column.clone(),
            value_column: self.config.value_column.clone(),
            date_format: self.config.date_format.clone(),
        });

        let mut results: Vec<(usize, CleanedSeries)> = Vec::with_capacity(files.len());
        let mut failed: Vec<(usize, String)> = Vec::new();

        let mut outcomes = stream::iter(files.iter().cloned().enumerate())
            .map(|(index, file)| {
                let pipeline = Arc::clone(&pipeline);
                let layout = Arc::clone(&layout);
                let pb = pb.clone();
                async move {
                    pb.set_message(format!("Station {}", file.code));
                    let code = file.code.clone();
                    let path = file.path.clone();
                    let outcome = task::spawn_blocking(move || {
                        let series = load_station_series(&file.path, &layout)?;
                        pipeline.run(&file.code, &series)
                    })
                    .await
                    .map_err(|e| HidrometError::ProcessingFailed {
                        path: path.clone(),
                        reason: format!("Worker task failed: {}", e),
                    })
                    .and_then(|result| result);
                    pb.inc(1);
                    (index, code, path, outcome)
                }
            })
            .buffer_unordered(self.config.workers.max(1));

        while let Some((index, code, path, outcome)) = outcomes.next().await {
            match outcome {
                Ok(cleaned) => {
                    debug!("Cleaned {}: {}", path.display(), cleaned.stats.summary());
                    results.push((index, cleaned));
                }
                Err(e) => {
                    error!("Failed to process {}: {:#}", path.display(), e);
                    failed.push((index, code));
                }
            }
        }

        pb.finish_with_message("All stations cleaned");

        results.sort_by_key(|(index, _)| *index);
        failed.sort_by_key(|(index, _)| *index);
        (
            results.into_iter().map(|(_, c)| c).collect(),
            failed.into_iter().map(|(_, code)| code).collect(),
        )
    }

    fn create_progress_bar(&self, total: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        ) {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }

    fn print_summary(
        &self,
        stats: &ProcessingStats,
        cleaned: &[CleanedSeries],
        ok_fraction: f64,
    ) {
        let count = |status: StationStatus| {
            cleaned
                .iter()
                .filter(|c| c.report.status == status)
                .count()
        };

        println!("\n{}", "Processing Summary".bright_green().bold());
        println!(
            "  {} {}ms",
            "Time elapsed:".bright_cyan(),
            stats.processing_time_ms.to_string().bright_white()
        );
        println!(
            "  {} {}",
            "Stations cleaned:".bright_cyan(),
            stats.stations_processed.to_string().bright_white()
        );
        if stats.stations_failed > 0 {
            println!(
                "  {} {}",
                "Stations failed:".bright_red(),
                stats.stations_failed.to_string().bright_red().bold()
            );
        }
        println!(
            "  {} {} ok, {} with failures, {} not representative, {} empty",
            "Triage:".bright_cyan(),
            count(StationStatus::Ok).to_string().bright_green(),
            count(StationStatus::TooManyFailures).to_string().bright_yellow(),
            count(StationStatus::NotRepresentative).to_string().bright_yellow(),
            count(StationStatus::EmptySeries).to_string().bright_red()
        );
        println!(
            "  {} {}%",
            "Fit for analysis:".bright_cyan(),
            format!("{:.1}", ok_fraction * 100.0).bright_white()
        );
        println!(
            "  {} {}",
            "Total readings:".bright_cyan(),
            stats.total_readings.to_string().bright_white().bold()
        );
    }
}
