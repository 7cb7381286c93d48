use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Square meters per trillion square meters.
pub const AREA_SCALE: f64 = 1e12;

/// Aggregated attributes of one ice chart shapefile.
///
/// `date` is taken verbatim from the shapefile name and starts with `YYYYMMDD`;
/// anything after the first eight characters (a time stamp, a region suffix) is
/// kept so records stay traceable to their source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IceSummary {
    pub date: String,
    /// Mean of the `CT` column, in percent.
    pub average_ice_concentration: f64,
    /// Sum of polygon areas, in square meters.
    pub total_area: f64,
}

/// A summary record ready for plotting.
#[derive(Debug, Clone, PartialEq)]
pub struct IcePoint {
    pub date: NaiveDate,
    pub average_ice_concentration: f64,
    /// Total area in trillions of square meters.
    pub total_area: f64,
}

/// Convert square meters to trillions of square meters.
pub fn to_trillions(square_meters: f64) -> f64 {
    square_meters / AREA_SCALE
}
