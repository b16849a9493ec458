//! Time-series line chart.

use super::{RenderingStrategy, draw_empty, style, unexpected_series};
use crate::error::RenderError;
use crate::shape::{NormalizedResultSet, Series, TimePoint};
use chrono::{Days, NaiveDate};
use plotters::prelude::*;
use rust_decimal::prelude::ToPrimitive;
use std::path::Path;

/// Plots points in the order given, joined by straight segments. Missing
/// dates are not filled in, so a gap shows as a longer segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineRenderer;

/// Date span of the x axis, padded so a single point is not degenerate.
pub fn date_span(points: &[TimePoint]) -> Option<(NaiveDate, NaiveDate)> {
    let first = points.iter().map(|p| p.at).min()?;
    let last = points.iter().map(|p| p.at).max()?;
    let pad = Days::new(15);
    Some((
        first.checked_sub_days(pad).unwrap_or(first),
        last.checked_add_days(pad).unwrap_or(last),
    ))
}

impl RenderingStrategy for LineRenderer {
    fn draw(
        &self,
        data: &NormalizedResultSet,
        title: &str,
        destination: &Path,
    ) -> Result<(), RenderError> {
        let Series::Timeline(points) = &data.series else {
            return Err(unexpected_series("line", data));
        };

        let root = SVGBackend::new(destination, style::CANVAS).into_drawing_area();
        root.fill(&WHITE)?;
        let Some((start, end)) = date_span(points) else {
            draw_empty(&root, title)?;
            root.present()?;
            return Ok(());
        };

        let series: Vec<(NaiveDate, f64)> = points
            .iter()
            .map(|p| (p.at, p.value.to_f64().unwrap_or(0.0)))
            .collect();
        let (low, high) = style::padded_span(series.iter().map(|(_, v)| *v));
        let low = low.min(0.0);

        let mut chart = ChartBuilder::on(&root)
            .caption(title, style::title_style())
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(start..end, low..high)?;

        let date_label = |d: &NaiveDate| d.format("%Y-%m").to_string();
        let value_label = |v: &f64| format!("{:.0}", v);
        chart
            .configure_mesh()
            .x_labels(12)
            .x_label_formatter(&date_label)
            .y_label_formatter(&value_label)
            .label_style(style::tick_style())
            .x_desc(data.axis.x.as_str())
            .y_desc(data.axis.y.as_str())
            .axis_desc_style(style::label_style())
            .draw()?;

        let color = style::primary();
        chart.draw_series(LineSeries::new(series.iter().copied(), color.stroke_width(2)))?;
        chart.draw_series(
            series
                .iter()
                .map(|point| Circle::new(*point, 3, color.filled())),
        )?;

        root.present()?;
        Ok(())
    }
}
