//! Plain two-column scatter plot.

use super::{RenderingStrategy, draw_empty, style, unexpected_series};
use crate::error::RenderError;
use crate::shape::{NormalizedResultSet, Series};
use plotters::prelude::*;
use std::path::Path;

/// Plots each (x, y) pair as a dot. No trend line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScatterRenderer;

impl RenderingStrategy for ScatterRenderer {
    fn draw(
        &self,
        data: &NormalizedResultSet,
        title: &str,
        destination: &Path,
    ) -> Result<(), RenderError> {
        let Series::Points(points) = &data.series else {
            return Err(unexpected_series("scatter", data));
        };

        let root = SVGBackend::new(destination, style::CANVAS).into_drawing_area();
        root.fill(&WHITE)?;
        if points.is_empty() {
            draw_empty(&root, title)?;
            root.present()?;
            return Ok(());
        }

        let (x_low, x_high) = style::padded_span(points.iter().map(|(x, _)| *x));
        let (y_low, y_high) = style::padded_span(points.iter().map(|(_, y)| *y));

        let mut chart = ChartBuilder::on(&root)
            .caption(title, style::title_style())
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(x_low..x_high, y_low..y_high)?;

        let number = |v: &f64| format!("{:.0}", v);
        chart
            .configure_mesh()
            .x_label_formatter(&number)
            .y_label_formatter(&number)
            .label_style(style::tick_style())
            .x_desc(data.axis.x.as_str())
            .y_desc(data.axis.y.as_str())
            .axis_desc_style(style::label_style())
            .draw()?;

        let dot = style::primary().mix(0.6).filled();
        chart.draw_series(points.iter().map(|point| Circle::new(*point, 3, dot)))?;

        root.present()?;
        Ok(())
    }
}
