//! Vertical and horizontal bar charts.

use super::{RenderingStrategy, draw_empty, style, unexpected_series};
use crate::error::RenderError;
use crate::shape::{NormalizedResultSet, Series};
use plotters::prelude::*;
use rust_decimal::prelude::ToPrimitive;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// Bars in input order along the category axis. Nothing is re-sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarRenderer {
    pub orientation: Orientation,
    /// Longest category label drawn before truncation.
    pub max_label_chars: usize,
}

impl BarRenderer {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            max_label_chars: 16,
        }
    }
}

impl RenderingStrategy for BarRenderer {
    fn draw(
        &self,
        data: &NormalizedResultSet,
        title: &str,
        destination: &Path,
    ) -> Result<(), RenderError> {
        let Series::Categories(rows) = &data.series else {
            return Err(unexpected_series("bar", data));
        };

        let root = SVGBackend::new(destination, style::CANVAS).into_drawing_area();
        root.fill(&WHITE)?;
        if rows.is_empty() {
            draw_empty(&root, title)?;
            root.present()?;
            return Ok(());
        }

        let labels: Vec<String> = rows
            .iter()
            .map(|row| style::short_label(&row.label, self.max_label_chars))
            .collect();
        let values: Vec<f64> = rows
            .iter()
            .map(|row| row.value.to_f64().unwrap_or(0.0))
            .collect();
        let ceiling = style::value_ceiling(values.iter().copied().fold(0.0, f64::max));
        let last = rows.len() as i32 - 1;
        let category_label = |v: &SegmentValue<i32>| match v {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => labels
                .get(*i as usize)
                .cloned()
                .unwrap_or_default(),
            SegmentValue::Last => String::new(),
        };
        let value_label = |v: &f64| format!("{:.0}", v);
        let fill = style::primary().filled();

        match self.orientation {
            Orientation::Vertical => {
                let mut chart = ChartBuilder::on(&root)
                    .caption(title, style::title_style())
                    .margin(15)
                    .x_label_area_size(110)
                    .y_label_area_size(80)
                    .build_cartesian_2d((0..last).into_segmented(), 0.0..ceiling)?;

                chart
                    .configure_mesh()
                    .disable_x_mesh()
                    .x_labels(rows.len() + 1)
                    .x_label_formatter(&category_label)
                    .x_label_style(
                        style::tick_style().transform(FontTransform::Rotate90),
                    )
                    .y_label_formatter(&value_label)
                    .x_desc(data.axis.x.as_str())
                    .y_desc(data.axis.y.as_str())
                    .axis_desc_style(style::label_style())
                    .draw()?;

                chart.draw_series(
                    Histogram::vertical(&chart)
                        .style(fill)
                        .margin(6)
                        .data(values.iter().enumerate().map(|(i, v)| (i as i32, *v))),
                )?;
            }
            Orientation::Horizontal => {
                let mut chart = ChartBuilder::on(&root)
                    .caption(title, style::title_style())
                    .margin(15)
                    .x_label_area_size(50)
                    .y_label_area_size(150)
                    .build_cartesian_2d(0.0..ceiling, (0..last).into_segmented())?;

                chart
                    .configure_mesh()
                    .disable_y_mesh()
                    .y_labels(rows.len() + 1)
                    .y_label_formatter(&category_label)
                    .x_label_formatter(&value_label)
                    .label_style(style::tick_style())
                    .x_desc(data.axis.y.as_str())
                    .y_desc(data.axis.x.as_str())
                    .axis_desc_style(style::label_style())
                    .draw()?;

                chart.draw_series(
                    Histogram::horizontal(&chart)
                        .style(fill)
                        .margin(4)
                        .data(values.iter().enumerate().map(|(i, v)| (i as i32, *v))),
                )?;
            }
        }

        root.present()?;
        Ok(())
    }
}
