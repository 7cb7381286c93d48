//! Observed December extent with linear and polynomial projections.

use std::ops::Range;
use std::path::Path;

use plotters::prelude::*;

use super::{min_max, ChartError, CHART_SIZE, FONT};
use crate::models::{Projection, YearExtent};

pub const Y_LABEL: &str = "Sea Ice Extent (Million km²)";
pub const OBSERVED_LABEL: &str = "Observed Sea Ice Extent (Million km²)";

/// Extent units added above and below the observed range.
pub const Y_PADDING: f64 = 1.0;

/// Half width of the outlier marker, in pixels.
const MARKER_SIZE: i32 = 5;

pub fn title(future_years: u32) -> String {
    format!("December Arctic Sea Ice Extent: Historical Data and {future_years}-Year Projections")
}

/// Axis ranges for the projection chart.
///
/// The y range follows the observed (outlier-free) data only, so projections
/// and outliers never stretch it; outliers are drawn as markers on its floor.
#[derive(Debug, Clone, PartialEq)]
pub struct Axes {
    pub years: Range<i32>,
    pub extent: Range<f64>,
}

impl Axes {
    pub fn new(data: &[YearExtent], projection: &Projection) -> Result<Self, ChartError> {
        let (y_min, y_max) = min_max(data.iter().map(|d| d.extent)).ok_or(ChartError::Empty)?;

        let years = data
            .iter()
            .map(|d| d.year)
            .chain(projection.years.iter().copied());
        let first = years.clone().min().ok_or(ChartError::Empty)?;
        let last = years.max().ok_or(ChartError::Empty)?;

        Ok(Self {
            years: (first - 1)..(last + 2),
            extent: (y_min - Y_PADDING)..(y_max + Y_PADDING),
        })
    }

    pub fn floor(&self) -> f64 {
        self.extent.start
    }
}

/// Render the projection chart to a PNG at `path`.
pub fn render(
    data: &[YearExtent],
    projection: &Projection,
    outliers: &[YearExtent],
    future_years: u32,
    path: &Path,
) -> Result<(), ChartError> {
    let axes = Axes::new(data, projection)?;

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title(future_years), (FONT, 20))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(axes.years.clone(), axes.extent.clone())?;

    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc(Y_LABEL)
        .light_line_style(&BLACK.mix(0.08))
        .draw()?;

    chart
        .draw_series(data.iter().map(|d| Circle::new((d.year, d.extent), 3, BLUE.filled())))?
        .label(OBSERVED_LABEL)
        .legend(|(x, y)| Circle::new((x + 10, y), 3, BLUE.filled()));

    let linear: Vec<(i32, f64)> = projection.rows().map(|(year, lin, _)| (year, lin)).collect();
    let polynomial: Vec<(i32, f64)> =
        projection.rows().map(|(year, _, poly)| (year, poly)).collect();

    chart
        .draw_series(DashedLineSeries::new(linear, 8, 5, RED.stroke_width(2)))?
        .label("Linear Projection")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 8, y)], &RED));

    chart
        .draw_series(LineSeries::new(polynomial, RED.stroke_width(2)))?
        .label(format!("Polynomial Projection (Degree {})", projection.degree))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));

    if !outliers.is_empty() {
        let floor = axes.floor();
        chart
            .draw_series(outliers.iter().map(|o| {
                // tip on the floor, body above it
                EmptyElement::at((o.year, floor))
                    + Polygon::new(
                        vec![
                            (-MARKER_SIZE, -2 * MARKER_SIZE),
                            (MARKER_SIZE, -2 * MARKER_SIZE),
                            (0, 0),
                        ],
                        RED.filled(),
                    )
            }))?
            .label("Outliers (Indicator)")
            .legend(|(x, y)| {
                Polygon::new(vec![(x + 5, y - 5), (x + 15, y - 5), (x + 10, y + 5)], RED.filled())
            });
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    tracing::info!("Projection chart saved as {}", path.display());
    Ok(())
}
