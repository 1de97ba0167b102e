//! Error handling for quality-control and batch processing operations.
//!
//! Distinguishes undefined results on empty series and invalid stage
//! parameters from the I/O and parsing failures of the batch front end.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HidrometError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{operation} is undefined on an empty series")]
    EmptySeries { operation: &'static str },

    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Input directory not found at path: {path}")]
    DatasetNotFound { path: PathBuf },

    #[error("Invalid file format: {path} - {reason}")]
    InvalidFormat { path: PathBuf, reason: String },

    #[error("Column `{column}` not found in file: {path}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("Could not parse date `{value}` in file: {path}")]
    DateParsing { path: PathBuf, value: String },

    #[error("Processing failed for file: {path} - {reason}")]
    ProcessingFailed { path: PathBuf, reason: String },
}

impl HidrometError {
    /// Create an invalid parameter error
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HidrometError>;
