//! Arctic sea-ice pipeline: chart archive download, shapefile summaries,
//! time series charts and December extent projections.

pub mod analysis;
pub mod archive;
pub mod chart;
pub mod config;
pub mod extent;
pub mod models;
pub mod pipeline;
pub mod scrape;
pub mod shapes;
pub mod summary;
