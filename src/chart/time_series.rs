//! Dual-axis chart of average concentration and total area over time.

use std::ops::Range;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use plotters::prelude::*;

use super::{min_max, padded_range, ChartError, CHART_SIZE, FONT};
use crate::models::IcePoint;

pub const TITLE: &str = "Arctic Ice: Average Concentration and Total Area Over Time";
pub const CONCENTRATION_LABEL: &str = "Average Ice Concentration (%)";
pub const AREA_LABEL: &str = "Total Ice Area (Trillion m²)";

/// Axis padding as a fraction of the data range.
pub const CONCENTRATION_PADDING: f64 = 0.05;
pub const AREA_PADDING: f64 = 0.25;

/// Axis ranges for a series of points.
#[derive(Debug, Clone, PartialEq)]
pub struct Axes {
    pub dates: Range<NaiveDate>,
    pub concentration: Range<f64>,
    pub area: Range<f64>,
}

impl Axes {
    pub fn for_points(points: &[IcePoint]) -> Result<Self, ChartError> {
        let first = points.iter().map(|p| p.date).min().ok_or(ChartError::Empty)?;
        let last = points.iter().map(|p| p.date).max().ok_or(ChartError::Empty)?;
        let margin = Duration::days(((last - first).num_days() / 20).max(15));

        let (c_min, c_max) = min_max(points.iter().map(|p| p.average_ice_concentration))
            .ok_or(ChartError::Empty)?;
        let (a_min, a_max) =
            min_max(points.iter().map(|p| p.total_area)).ok_or(ChartError::Empty)?;

        Ok(Self {
            dates: (first - margin)..(last + margin),
            concentration: padded_range(c_min, c_max, CONCENTRATION_PADDING),
            area: padded_range(a_min, a_max, AREA_PADDING),
        })
    }
}

/// Render `points` (date-sorted, area in trillions of m²) to a PNG at `path`.
pub fn render(points: &[IcePoint], path: &Path) -> Result<(), ChartError> {
    let axes = Axes::for_points(points)?;

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(TITLE, (FONT, 22))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .right_y_label_area_size(70)
        .build_cartesian_2d(axes.dates.clone(), axes.concentration.clone())?
        .set_secondary_coord(axes.dates.clone(), axes.area.clone());

    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc(CONCENTRATION_LABEL)
        .y_label_style((FONT, 14).into_font().color(&BLUE))
        .x_label_formatter(&|d: &NaiveDate| d.format("%Y").to_string())
        .light_line_style(&BLACK.mix(0.08))
        .draw()?;

    chart
        .configure_secondary_axes()
        .y_desc(AREA_LABEL)
        .label_style((FONT, 14).into_font().color(&RED))
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            points.iter().map(|p| (p.date, p.average_ice_concentration)),
            BLUE.stroke_width(2),
        ))?
        .label(CONCENTRATION_LABEL)
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    chart
        .draw_secondary_series(LineSeries::new(
            points.iter().map(|p| (p.date, p.total_area)),
            RED.stroke_width(2),
        ))?
        .label(AREA_LABEL)
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    tracing::info!("Chart saved as {}", path.display());
    Ok(())
}
