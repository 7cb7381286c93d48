//! The four pipeline stages, wired to a [`PipelineConfig`].
//!
//! Stages only share files: `fetch` fills the download directory, `process`
//! turns it into the JSON summary, `plot` charts the summary. `project` is
//! independent of the other three.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::PipelineConfig;
use crate::models::{OutlierReport, Projection, YearExtent};
use crate::scrape::IceClient;
use crate::{analysis, archive, chart, extent, shapes, summary};

/// Download every selected December archive.
pub async fn fetch(config: &PipelineConfig, skip_existing: bool) -> Result<Vec<PathBuf>> {
    IceClient::new()
        .scrape_and_download(&config.base_url, &config.download_dir, skip_existing)
        .await
        .with_context(|| format!("scraping {}", config.base_url))
}

/// Extract the downloaded archives and write the JSON summary.
pub fn process(config: &PipelineConfig) -> Result<usize> {
    tracing::info!("Extracting .tar files...");
    archive::extract_tar_files(&config.download_dir, &config.extract_dir).with_context(|| {
        format!(
            "extracting {} into {}",
            config.download_dir.display(),
            config.extract_dir.display()
        )
    })?;

    tracing::info!("Processing shapefiles...");
    let records = shapes::process_shapefiles(&config.extract_dir)
        .with_context(|| format!("processing {}", config.extract_dir.display()))?;

    summary::save_summary(&records, &config.summary_path)
        .with_context(|| format!("writing {}", config.summary_path.display()))?;
    Ok(records.len())
}

/// Chart the JSON summary.
pub fn plot(config: &PipelineConfig) -> Result<()> {
    let records = summary::load_summary(&config.summary_path)
        .with_context(|| format!("reading {}", config.summary_path.display()))?;
    let points = summary::to_time_series(&records)?;
    chart::time_series::render(&points, &config.chart_path)
        .with_context(|| format!("rendering {}", config.chart_path.display()))
}

/// Everything the projection stage computed, for callers that want more than the chart.
#[derive(Debug, Clone)]
pub struct ProjectionRun {
    pub observed: Vec<YearExtent>,
    pub report: OutlierReport,
    pub projection: Projection,
}

/// Clean the extent CSV, drop outliers and fit the trends.
pub fn analyze_extent(config: &PipelineConfig) -> Result<ProjectionRun> {
    tracing::info!("Processing data...");
    let data = extent::process_data(&config.extent_csv)
        .with_context(|| format!("cleaning {}", config.extent_csv.display()))?;

    let report = analysis::detect_outliers(&data)?;
    let observed = analysis::retain_inliers(&data, &report);

    tracing::info!("Generating projections...");
    let projection = analysis::generate_projections(&observed, config.future_years, config.degree)?;

    Ok(ProjectionRun {
        observed,
        report,
        projection,
    })
}

/// Download (unless `use_local`), analyze and chart the December extent series.
pub async fn project(config: &PipelineConfig, use_local: bool) -> Result<ProjectionRun> {
    if use_local {
        tracing::info!("Using local file: {}", config.extent_csv.display());
    } else {
        tracing::info!("Downloading December sea ice data...");
        extent::download_file_ftp(&config.ftp_host, &config.ftp_path, &config.extent_csv)
            .await
            .with_context(|| format!("downloading ftp://{}/{}", config.ftp_host, config.ftp_path))?;
    }

    let run = analyze_extent(config)?;

    tracing::info!("Plotting projections...");
    chart::projection::render(
        &run.observed,
        &run.projection,
        &run.report.outliers,
        config.future_years,
        &config.projection_chart,
    )
    .with_context(|| format!("rendering {}", config.projection_chart.display()))?;

    Ok(run)
}
