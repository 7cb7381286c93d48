//! Outlier screening and trend projection for the extent series.

mod fit;

use thiserror::Error;

pub use fit::{generate_projections, PolynomialFit};

use crate::models::{OutlierReport, YearExtent};

/// Multiplier of the interquartile range used for outlier bounds.
pub const IQR_FACTOR: f64 = 1.5;

#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error("No data points")]
    Empty,

    #[error("Quantile {0} is outside [0, 1]")]
    InvalidQuantile(f64),

    #[error("Degree {degree} fit needs at least {needed} points, got {got}")]
    InsufficientData {
        degree: usize,
        needed: usize,
        got: usize,
    },

    #[error("Least squares solve failed: {0}")]
    Solve(&'static str),

    #[error("Projecting {future_years} years past {last} leaves the calendar range")]
    Horizon { last: i32, future_years: u32 },
}

/// Quantile `q` of `values` using linear interpolation between closest ranks.
pub fn quantile(values: &[f64], q: f64) -> Result<f64, AnalysisError> {
    if values.is_empty() {
        return Err(AnalysisError::Empty);
    }
    if !(0.0..=1.0).contains(&q) {
        return Err(AnalysisError::InvalidQuantile(q));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let h = (sorted.len() - 1) as f64 * q;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    Ok(sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo]))
}

/// Flag extents outside `[Q1 - 1.5·IQR, Q3 + 1.5·IQR]`.
pub fn detect_outliers(data: &[YearExtent]) -> Result<OutlierReport, AnalysisError> {
    let extents: Vec<f64> = data.iter().map(|d| d.extent).collect();
    let q1 = quantile(&extents, 0.25)?;
    let q3 = quantile(&extents, 0.75)?;
    let iqr = q3 - q1;

    let lower_bound = q1 - IQR_FACTOR * iqr;
    let upper_bound = q3 + IQR_FACTOR * iqr;
    let outliers = data
        .iter()
        .filter(|d| d.extent < lower_bound || d.extent > upper_bound)
        .copied()
        .collect::<Vec<_>>();

    tracing::info!(
        "Outliers detected: {:?} (bounds {:.3}..={:.3})",
        outliers,
        lower_bound,
        upper_bound
    );

    Ok(OutlierReport {
        outliers,
        lower_bound,
        upper_bound,
    })
}

/// Rows whose extent lies within the report's bounds.
pub fn retain_inliers(data: &[YearExtent], report: &OutlierReport) -> Vec<YearExtent> {
    data.iter()
        .filter(|d| report.within_bounds(d.extent))
        .copied()
        .collect()
}
