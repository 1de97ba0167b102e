//! Hidromet Library
//!
//! Quality control for daily rainfall gauge series, ahead of hydrological
//! analysis of a river basin.
//!
//! This library provides tools for:
//! - Removing duplicated timestamps and duplicated station columns
//! - Nulling outliers above a daily rainfall limit and negative readings
//! - Dropping calendar months with too few valid days
//! - Computing failure fractions and years of usable record
//! - Clipping series to an analysis period
//! - Triage of a basin's stations and writing the cleaned table and reports

pub mod basin;
pub mod cleaning;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod processor;
pub mod series;

// Re-export commonly used types
pub use basin::{BasinReport, classify};
pub use cleaning::{CleanedSeries, CleaningStats, QualityPipeline};
pub use config::{OutputFormat, Period, ProcessingConfig, QualityControlConfig};
pub use error::{HidrometError, Result};
pub use models::{ProcessingStats, QualityReport, Station, StationStatus};
pub use processor::BasinProcessor;
pub use series::{Reading, StationSeriesCollection, TimeSeries};
