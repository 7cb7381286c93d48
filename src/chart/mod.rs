//! PNG charts rendered with plotters.

pub mod projection;
pub mod time_series;

use std::ops::Range;

use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

/// Output size in pixels (12 x 6 inches at 100 dpi).
pub const CHART_SIZE: (u32, u32) = (1200, 600);
pub const FONT: &str = "sans-serif";

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Nothing to plot")]
    Empty,

    #[error("Drawing failed: {0}")]
    Drawing(String),
}

impl<E> From<DrawingAreaErrorKind<E>> for ChartError
where
    E: std::error::Error + Send + Sync,
{
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        Self::Drawing(e.to_string())
    }
}

/// Smallest and largest value of `values`, `None` when empty.
pub fn min_max<I: IntoIterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    values.into_iter().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// `[min - pad, max + pad]` with `pad = (max - min) * fraction`.
///
/// A flat series gets a fixed half-unit margin so the axis keeps a non-zero span.
pub fn padded_range(min: f64, max: f64, fraction: f64) -> Range<f64> {
    let pad = (max - min) * fraction;
    if pad > 0.0 {
        (min - pad)..(max + pad)
    } else {
        (min - 0.5)..(max + 0.5)
    }
}
