//! Monthly sea-ice extent: download and cleaning.
//!
//! The extent index is a small CSV published per month of the year. Rows look
//! like `1979,   12,     Goddard,      N,  13.67,  11.10`; the header row is
//! replaced by fixed column names and only December rows are kept.

mod ftp;

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use ftp::download_file_ftp;

use crate::models::{ExtentRecord, YearExtent};

/// Column names assigned to the extent CSV, in file order.
pub const COLUMNS: [&str; 6] = ["Year", "Month", "Data_Type", "Region", "Extent", "Area"];

pub const DECEMBER: u32 = 12;

#[derive(Debug, Error)]
pub enum ExtentError {
    #[error("FTP error: {0}")]
    Ftp(#[from] suppaftp::FtpError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Row {row}: expected {expected} columns, found {found}")]
    ColumnCount {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Row {row}: invalid {column} value {value:?}")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("FTP transfer task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

fn invalid(row: usize, column: &'static str, value: &str) -> ExtentError {
    ExtentError::InvalidValue {
        row,
        column,
        value: value.to_string(),
    }
}

/// Year of a row, or `None` when the Year column is not a finite number.
fn parse_year(row: usize, value: &str) -> Result<Option<i32>, ExtentError> {
    let numeric = match value.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => return Ok(None),
    };
    if numeric.fract() != 0.0 || numeric < f64::from(i32::MIN) || numeric > f64::from(i32::MAX) {
        return Err(invalid(row, COLUMNS[0], value));
    }
    Ok(Some(numeric as i32))
}

/// Parse the extent CSV into typed rows.
///
/// The first line is a header and is discarded. Rows with a non-numeric Year
/// are dropped; any other malformed value fails the whole read.
pub fn clean_extent_csv<R: Read>(reader: R) -> Result<Vec<ExtentRecord>, ExtentError> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    tracing::debug!("Original columns: {:?}", csv.headers()?);

    let mut records = Vec::new();
    for (i, result) in csv.records().enumerate() {
        let row = i + 1;
        let fields = result?;
        if i < 5 {
            tracing::debug!("{:?}", fields);
        }
        if fields.len() != COLUMNS.len() {
            return Err(ExtentError::ColumnCount {
                row,
                expected: COLUMNS.len(),
                found: fields.len(),
            });
        }

        let Some(year) = parse_year(row, &fields[0])? else {
            continue;
        };
        let month = fields[1]
            .parse::<u32>()
            .map_err(|_| invalid(row, COLUMNS[1], &fields[1]))?;
        let extent = fields[4]
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| invalid(row, COLUMNS[4], &fields[4]))?;

        records.push(ExtentRecord {
            year,
            month,
            data_type: fields[2].to_string(),
            region: fields[3].to_string(),
            extent,
            area: fields[5].to_string(),
        });
    }

    Ok(records)
}

/// December `{Year, Extent}` pairs, in file order.
pub fn december_extent(records: &[ExtentRecord]) -> Vec<YearExtent> {
    records
        .iter()
        .filter(|r| r.month == DECEMBER)
        .map(|r| YearExtent::new(r.year, r.extent))
        .collect()
}

/// Read and clean the extent CSV at `path`, keeping December only.
pub fn process_data(path: &Path) -> Result<Vec<YearExtent>, ExtentError> {
    let file = File::open(path).map_err(|source| ExtentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = clean_extent_csv(file)?;
    Ok(december_extent(&records))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_must_be_integral_when_numeric() {
        assert_eq!(parse_year(1, "1979").unwrap(), Some(1979));
        assert_eq!(parse_year(1, "1979.0").unwrap(), Some(1979));
        assert_eq!(parse_year(1, "year").unwrap(), None);
        assert!(parse_year(1, "1979.5").is_err());
    }

    #[test]
    fn non_finite_years_are_not_numeric() {
        assert_eq!(parse_year(1, "NaN").unwrap(), None);
        assert_eq!(parse_year(1, "inf").unwrap(), None);
        assert_eq!(parse_year(1, "-infinity").unwrap(), None);
    }
}
