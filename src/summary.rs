//! `ice_data.json` persistence and conversion to a plottable time series.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use thiserror::Error;

use crate::models::{to_trillions, IcePoint, IceSummary};

/// Length of the `YYYYMMDD` prefix of a summary date.
const DATE_PREFIX_LEN: usize = 8;
const DATE_FORMAT: &str = "%Y%m%d";

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid date {date:?}: {source}")]
    Date {
        date: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Write `records` as a 4-space indented JSON array.
pub fn save_summary(records: &[IceSummary], path: &Path) -> Result<(), SummaryError> {
    let mut writer = BufWriter::new(File::create(path)?);
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    records.serialize(&mut serializer)?;
    writer.flush()?;

    tracing::info!("Data saved to {}", path.display());
    Ok(())
}

pub fn load_summary(path: &Path) -> Result<Vec<IceSummary>, SummaryError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Parse the `YYYYMMDD` prefix of a summary date.
pub fn parse_summary_date(date: &str) -> Result<NaiveDate, SummaryError> {
    let prefix: String = date.chars().take(DATE_PREFIX_LEN).collect();
    NaiveDate::parse_from_str(&prefix, DATE_FORMAT).map_err(|source| SummaryError::Date {
        date: date.to_string(),
        source,
    })
}

/// Convert summary records into date-sorted plot points with area in trillions of m².
pub fn to_time_series(records: &[IceSummary]) -> Result<Vec<IcePoint>, SummaryError> {
    let mut points = records
        .iter()
        .map(|r| {
            Ok(IcePoint {
                date: parse_summary_date(&r.date)?,
                average_ice_concentration: r.average_ice_concentration,
                total_area: to_trillions(r.total_area),
            })
        })
        .collect::<Result<Vec<_>, SummaryError>>()?;

    points.sort_by_key(|p| p.date);
    Ok(points)
}
