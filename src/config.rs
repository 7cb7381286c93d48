//! Pipeline configuration.
//!
//! Every path, URL and tuning constant of the pipeline lives here. Defaults are
//! the values the pipeline was designed around; each one can be overridden from
//! the environment:
//! - `SEA_ICE_BASE_URL` - Portal directory holding the year folders
//! - `SEA_ICE_DATA_DIR` - Where downloaded `.tar` archives are stored
//! - `SEA_ICE_SHAPEFILE_DIR` - Where archives are extracted
//! - `SEA_ICE_SUMMARY` - JSON summary path
//! - `SEA_ICE_CHART` - Time series chart path
//! - `SEA_ICE_FTP_HOST` / `SEA_ICE_FTP_PATH` - Extent CSV location
//! - `SEA_ICE_EXTENT_CSV` - Local copy of the extent CSV
//! - `SEA_ICE_PROJECTION_CHART` - Projection chart path
//! - `SEA_ICE_FUTURE_YEARS` / `SEA_ICE_DEGREE` - Projection horizon and polynomial degree

use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://noaadata.apps.nsidc.org/NOAA/G02171/Eastern_Arctic/";
pub const DEFAULT_DOWNLOAD_DIR: &str = "data";
pub const DEFAULT_EXTRACT_DIR: &str = "shapefiles";
pub const DEFAULT_SUMMARY_FILE: &str = "ice_data.json";
pub const DEFAULT_CHART_FILE: &str = "ice_chart.png";

pub const DEFAULT_FTP_HOST: &str = "sidads.colorado.edu";
pub const DEFAULT_FTP_PATH: &str = "DATASETS/NOAA/G02135/north/monthly/data/N_12_extent_v3.0.csv";
pub const DEFAULT_EXTENT_CSV: &str = "N_12_extent_v3.0.csv";
pub const DEFAULT_PROJECTION_CHART: &str = "december_sea_ice_projections_with_outliers.png";

pub const DEFAULT_FUTURE_YEARS: u32 = 30;
pub const DEFAULT_DEGREE: usize = 2;

#[derive(Clone, Debug, PartialEq)]
pub struct PipelineConfig {
    pub base_url: String,
    pub download_dir: PathBuf,
    pub extract_dir: PathBuf,
    pub summary_path: PathBuf,
    pub chart_path: PathBuf,
    pub ftp_host: String,
    pub ftp_path: String,
    pub extent_csv: PathBuf,
    pub projection_chart: PathBuf,
    pub future_years: u32,
    pub degree: usize,
}

impl PipelineConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    ///
    /// Unparseable numeric values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let path = |key: &str, default: PathBuf| lookup(key).map(PathBuf::from).unwrap_or(default);

        Self {
            base_url: lookup("SEA_ICE_BASE_URL").unwrap_or(defaults.base_url),
            download_dir: path("SEA_ICE_DATA_DIR", defaults.download_dir),
            extract_dir: path("SEA_ICE_SHAPEFILE_DIR", defaults.extract_dir),
            summary_path: path("SEA_ICE_SUMMARY", defaults.summary_path),
            chart_path: path("SEA_ICE_CHART", defaults.chart_path),
            ftp_host: lookup("SEA_ICE_FTP_HOST").unwrap_or(defaults.ftp_host),
            ftp_path: lookup("SEA_ICE_FTP_PATH").unwrap_or(defaults.ftp_path),
            extent_csv: path("SEA_ICE_EXTENT_CSV", defaults.extent_csv),
            projection_chart: path("SEA_ICE_PROJECTION_CHART", defaults.projection_chart),
            future_years: lookup("SEA_ICE_FUTURE_YEARS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.future_years),
            degree: lookup("SEA_ICE_DEGREE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.degree),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            download_dir: PathBuf::from(DEFAULT_DOWNLOAD_DIR),
            extract_dir: PathBuf::from(DEFAULT_EXTRACT_DIR),
            summary_path: PathBuf::from(DEFAULT_SUMMARY_FILE),
            chart_path: PathBuf::from(DEFAULT_CHART_FILE),
            ftp_host: DEFAULT_FTP_HOST.to_string(),
            ftp_path: DEFAULT_FTP_PATH.to_string(),
            extent_csv: PathBuf::from(DEFAULT_EXTENT_CSV),
            projection_chart: PathBuf::from(DEFAULT_PROJECTION_CHART),
            future_years: DEFAULT_FUTURE_YEARS,
            degree: DEFAULT_DEGREE,
        }
    }
}
