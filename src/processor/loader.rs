//! CSV loading for station series and station lists
//!
//! Every column is read as text (gauge codes and compact dates carry
//! leading zeros that numeric inference would drop) and converted
//! explicitly afterwards: dates with chrono, values by a non-strict cast
//! to `Float64` where nulls, unparseable text and NaN all become missing.

use crate::cleaning::deduplication::remove_duplicate_keys_by;
use crate::constants::station_columns;
use crate::error::{HidrometError, Result};
use crate::models::Station;
use crate::series::{Reading, TimeSeries};
use chrono::NaiveDate;
use polars::prelude::*;
use std::path::Path;
use tracing::{debug, warn};

/// Column layout of a station series file
#[derive(Debug, Clone)]
pub struct SeriesLayout {
    pub date_column: String,
    pub value_column: String,
    pub date_format: String,
}

/// Read a CSV file with every column as text
fn read_text_csv(path: &Path) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
        .map_err(|e| HidrometError::InvalidFormat {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

fn require_column<'a>(df: &'a DataFrame, path: &Path, name: &str) -> Result<&'a Column> {
    df.column(name).map_err(|_| HidrometError::MissingColumn {
        path: path.to_path_buf(),
        column: name.to_string(),
    })
}

fn float_values(column: &Column) -> Result<Vec<Option<f64>>> {
    let cast = column.cast(&DataType::Float64)?;
    Ok(cast.f64()?.into_iter().collect())
}

/// Load one station's series in file order
///
/// Rows without a date are skipped; a date that does not match the
/// layout's format is an error.
pub fn load_station_series(path: &Path, layout: &SeriesLayout) -> Result<TimeSeries> {
    let df = read_text_csv(path)?;

    let dates = require_column(&df, path, &layout.date_column)?.str()?;
    let values = float_values(require_column(&df, path, &layout.value_column)?)?;

    let mut readings = Vec::with_capacity(df.height());
    let mut skipped = 0usize;
    for (raw_date, value) in dates.into_iter().zip(values) {
        let Some(raw_date) = raw_date.map(str::trim).filter(|s| !s.is_empty()) else {
            skipped += 1;
            continue;
        };
        let date = NaiveDate::parse_from_str(raw_date, &layout.date_format).map_err(|_| {
            HidrometError::DateParsing {
                path: path.to_path_buf(),
                value: raw_date.to_string(),
            }
        })?;
        readings.push(Reading::new(date, value));
    }

    if skipped > 0 {
        warn!(
            "Skipped {} rows without a date in {}",
            skipped,
            path.display()
        );
    }
    debug!("Loaded {} readings from {}", readings.len(), path.display());

    Ok(TimeSeries::new(readings))
}

/// Load the station list produced by the watershed intersection step
///
/// Repeated codes keep their first row. Coordinates are optional.
pub fn load_station_list(path: &Path) -> Result<Vec<Station>> {
    if !path.is_file() {
        return Err(HidrometError::DatasetNotFound {
            path: path.to_path_buf(),
        });
    }

    let df = read_text_csv(path)?;
    let codes = require_column(&df, path, station_columns::CODE)?.str()?;

    let latitudes = match df.column(station_columns::LATITUDE) {
        Ok(column) => float_values(column)?,
        Err(_) => vec![None; df.height()],
    };
    let longitudes = match df.column(station_columns::LONGITUDE) {
        Ok(column) => float_values(column)?,
        Err(_) => vec![None; df.height()],
    };

    let stations: Vec<Station> = codes
        .into_iter()
        .zip(latitudes.into_iter().zip(longitudes))
        .filter_map(|(code, (latitude, longitude))| {
            let code = code.map(str::trim).filter(|c| !c.is_empty())?;
            Some(Station {
                code: code.to_string(),
                latitude: latitude.filter(|v| !v.is_nan()),
                longitude: longitude.filter(|v| !v.is_nan()),
            })
        })
        .collect();

    let total = stations.len();
    let unique = remove_duplicate_keys_by(stations, |s| s.code.clone());
    if unique.len() < total {
        warn!(
            "Station list {} repeats {} codes; keeping first occurrences",
            path.display(),
            total - unique.len()
        );
    }

    Ok(unique)
}
