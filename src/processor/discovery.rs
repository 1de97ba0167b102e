//! Station file discovery
//!
//! Finds per-station CSV files in the input directory and derives the
//! station code from each file name. Gauge codes are numeric, so the code
//! is the first run of digits in the file stem (`posto_02549001.csv` ->
//! `02549001`); stems without digits are used whole.

use crate::error::{HidrometError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, warn};

static STATION_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("station code pattern is valid"));

/// A station series file and the code it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationFile {
    pub code: String,
    pub path: PathBuf,
}

/// File discovery component for a basin input directory
#[derive(Debug)]
pub struct FileDiscovery {
    input_dir: PathBuf,
    file_pattern: String,
}

impl FileDiscovery {
    pub fn new(input_dir: PathBuf, file_pattern: impl Into<String>) -> Self {
        Self {
            input_dir,
            file_pattern: file_pattern.into(),
        }
    }

    /// Discover station files matching the pattern, sorted by path
    pub fn discover_station_files(&self) -> Result<Vec<StationFile>> {
        if !self.input_dir.is_dir() {
            return Err(HidrometError::DatasetNotFound {
                path: self.input_dir.clone(),
            });
        }

        let pattern = self.input_dir.join(&self.file_pattern);
        let pattern_str = pattern.to_string_lossy();
        debug!("Searching for station files with pattern: {}", pattern_str);

        let paths = glob::glob(&pattern_str).map_err(|e| HidrometError::InvalidParameter {
            name: "file_pattern",
            reason: e.to_string(),
        })?;

        let mut files = Vec::new();
        for entry in paths {
            match entry {
                Ok(path) if path.is_file() => {
                    if let Some(code) = station_code_from_path(&path) {
                        files.push(StationFile { code, path });
                    }
                }
                Ok(_) => {}
                Err(e) => warn!("Skipping unreadable path: {}", e),
            }
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        debug!(
            "Found {} station files in {}",
            files.len(),
            self.input_dir.display()
        );

        Ok(files)
    }
}

/// Station code encoded in a file name
pub fn station_code_from_path(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    if stem.is_empty() {
        return None;
    }

    let code = STATION_CODE
        .find(stem)
        .map(|m| m.as_str())
        .unwrap_or(stem);
    Some(code.to_string())
}
