//! Domain models for the sea-ice pipeline.
//!
//! # Ice charts
//!
//! - [`IceSummary`]: One aggregated record per processed shapefile, as persisted in
//!   `ice_data.json`.
//! - [`IcePoint`]: The plotted form of a summary, with a parsed date and the area
//!   scaled to trillions of square meters.
//!
//! # Extent series
//!
//! - [`ExtentRecord`]: One cleaned row of the monthly extent CSV.
//! - [`YearExtent`]: The `{Year, Extent}` table used for regression.
//! - [`OutlierReport`]: IQR bounds and the values that fell outside them.
//! - [`Projection`]: Linear and polynomial trends over observed and future years.

mod extent;
mod summary;

pub use extent::*;
pub use summary::*;
