//! Ice chart shapefile aggregation.
//!
//! Each chart shapefile carries one polygon per ice region, with the total ice
//! concentration of the region in the `CT` attribute. A chart is reduced to the
//! mean `CT` value and the summed polygon area.

mod area;

use std::path::{Path, PathBuf};

use shapefile::dbase::{FieldValue, Record};
use thiserror::Error;

pub use area::{detect_crs, shape_area, AtlasProjection, Crs, ATLAS_LAMBERT_DEFS};

use crate::archive::{self, ArchiveError};
use crate::models::IceSummary;

/// Attribute holding the total ice concentration, in percent.
pub const CONCENTRATION_FIELD: &str = "CT";

#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("Shapefile error in {path}: {source}")]
    Shapefile {
        path: PathBuf,
        #[source]
        source: shapefile::Error,
    },

    #[error("Missing projection file {0}")]
    MissingProjection(PathBuf),

    #[error("Unrecognized coordinate reference system: {0:?}")]
    UnknownCrs(String),

    #[error("Reprojection failed: {0}")]
    Projection(String),

    #[error("Cannot take a date from file name {0:?}")]
    NoDate(String),

    #[error("Non-numeric {field} value {value:?} in {path}")]
    NonNumeric {
        field: &'static str,
        value: String,
        path: PathBuf,
    },

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The chart date token of a shapefile name: its third `_`-separated part.
pub fn date_from_filename(file_name: &str) -> Result<String, ShapeError> {
    file_name
        .split('_')
        .nth(2)
        .map(str::to_string)
        .ok_or_else(|| ShapeError::NoDate(file_name.to_string()))
}

/// Read the coordinate reference system from the `.prj` next to `shp_path`.
pub fn read_crs(shp_path: &Path) -> Result<Crs, ShapeError> {
    let prj = shp_path.with_extension("prj");
    if !prj.is_file() {
        return Err(ShapeError::MissingProjection(prj));
    }
    detect_crs(&std::fs::read_to_string(&prj)?)
}

/// Numeric value of a dBase field, `None` when the field is empty.
fn numeric_value(value: &FieldValue) -> Result<Option<f64>, String> {
    match value {
        FieldValue::Character(None) | FieldValue::Numeric(None) | FieldValue::Float(None) => {
            Ok(None)
        }
        FieldValue::Character(Some(s)) => {
            let s = s.trim();
            if s.is_empty() {
                Ok(None)
            } else {
                s.parse::<f64>().map(Some).map_err(|_| s.to_string())
            }
        }
        FieldValue::Numeric(Some(v)) => Ok(Some(*v)),
        FieldValue::Float(Some(v)) => Ok(Some(f64::from(*v))),
        FieldValue::Integer(v) => Ok(Some(f64::from(*v))),
        FieldValue::Double(v) | FieldValue::Currency(v) => Ok(Some(*v)),
        other => Err(format!("{other:?}")),
    }
}

/// Mean concentration over records, skipping empty values.
///
/// Returns `Ok(None)` when no record carries a value.
fn mean_concentration(records: &[Record], path: &Path) -> Result<Option<f64>, ShapeError> {
    let mut sum = 0.0;
    let mut count = 0usize;

    for record in records {
        let Some(value) = record.get(CONCENTRATION_FIELD) else {
            continue;
        };
        let parsed = numeric_value(value).map_err(|value| ShapeError::NonNumeric {
            field: CONCENTRATION_FIELD,
            value,
            path: path.to_path_buf(),
        })?;
        if let Some(v) = parsed {
            sum += v;
            count += 1;
        }
    }

    Ok((count > 0).then(|| sum / count as f64))
}

/// Reduce one shapefile to a summary record.
///
/// Returns `None` when the file has no usable `CT` data.
pub fn summarize_shapefile(path: &Path) -> Result<Option<IceSummary>, ShapeError> {
    tracing::info!("Processing file: {}", path.display());

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let features = shapefile::read(path).map_err(|source| ShapeError::Shapefile {
        path: path.to_path_buf(),
        source,
    })?;

    let Some((_, first)) = features.first() else {
        tracing::warn!("File {} has no features.", file_name);
        return Ok(None);
    };
    if first.get(CONCENTRATION_FIELD).is_none() {
        tracing::warn!(
            "File {} does not contain '{}' attribute.",
            file_name,
            CONCENTRATION_FIELD
        );
        return Ok(None);
    }

    let date = date_from_filename(&file_name)?;
    let (shapes, records): (Vec<_>, Vec<_>) = features.into_iter().unzip();

    let Some(average) = mean_concentration(&records, path)? else {
        tracing::warn!("File {} has no '{}' values.", file_name, CONCENTRATION_FIELD);
        return Ok(None);
    };

    let projection = if read_crs(path)?.is_geographic() {
        tracing::info!("Reprojecting from geographic CRS to EPSG:3978");
        Some(AtlasProjection::new()?)
    } else {
        None
    };

    let mut total_area = 0.0;
    for shape in &shapes {
        total_area += shape_area(shape, projection.as_ref())?;
    }

    Ok(Some(IceSummary {
        date,
        average_ice_concentration: average,
        total_area,
    }))
}

/// Summarize every shapefile found below `dir`.
pub fn process_shapefiles(dir: &Path) -> Result<Vec<IceSummary>, ShapeError> {
    let mut summary = Vec::new();
    for path in archive::find_shapefiles(dir)? {
        if let Some(record) = summarize_shapefile(&path)? {
            summary.push(record);
        }
    }
    Ok(summary)
}
