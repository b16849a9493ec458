//! Static rendition of the animated bar chart: one small panel per time
//! bucket, in chronological order.

use super::{RenderingStrategy, draw_empty, style, unexpected_series};
use crate::error::RenderError;
use crate::shape::{NormalizedResultSet, Series};
use plotters::prelude::*;
use rust_decimal::prelude::ToPrimitive;
use std::path::Path;

const KEY_HEIGHT: u32 = 30;

/// Small multiples sharing one value scale and one category order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacetedBarRenderer {
    pub columns: usize,
    pub panel_size: (u32, u32),
}

impl Default for FacetedBarRenderer {
    fn default() -> Self {
        Self {
            columns: 4,
            panel_size: (300, 220),
        }
    }
}

impl FacetedBarRenderer {
    /// Grid of panels needed for `frames` buckets, as (rows, columns).
    pub fn layout(&self, frames: usize) -> (usize, usize) {
        let columns = self.columns.max(1).min(frames.max(1));
        (frames.max(1).div_ceil(columns), columns)
    }
}

impl RenderingStrategy for FacetedBarRenderer {
    fn draw(
        &self,
        data: &NormalizedResultSet,
        title: &str,
        destination: &Path,
    ) -> Result<(), RenderError> {
        let Series::Grid(grid) = &data.series else {
            return Err(unexpected_series("animated bar", data));
        };

        let (rows, columns) = self.layout(grid.frames.len());
        let canvas = (
            self.panel_size.0 * columns as u32,
            self.panel_size.1 * rows as u32 + 40 + KEY_HEIGHT,
        );
        let root = SVGBackend::new(destination, canvas).into_drawing_area();
        root.fill(&WHITE)?;
        if grid.is_empty() {
            draw_empty(&root, title)?;
            root.present()?;
            return Ok(());
        }

        let area = root.titled(title, style::title_style())?;
        let (_, height) = area.dim_in_pixel();
        let (panels, key) = area.split_vertically(height.saturating_sub(KEY_HEIGHT));
        let ceiling = style::value_ceiling(grid.max_value().to_f64().unwrap_or(0.0));
        let last = grid.categories.len() as i32 - 1;
        let no_labels = |_: &SegmentValue<i32>| String::new();
        let value_label = |v: &f64| format!("{:.0}", v);

        for (frame, panel) in grid.frames.iter().zip(panels.split_evenly((rows, columns))) {
            let mut chart = ChartBuilder::on(&panel)
                .caption(frame.bucket.format("%Y-%m").to_string(), style::tick_style())
                .margin(6)
                .x_label_area_size(10)
                .y_label_area_size(45)
                .build_cartesian_2d((0..last).into_segmented(), 0.0..ceiling)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_label_formatter(&no_labels)
                .y_labels(4)
                .y_label_formatter(&value_label)
                .label_style(style::tick_style())
                .draw()?;

            chart.draw_series(
                Histogram::vertical(&chart)
                    .style_func(|x, _| {
                        let index = match x {
                            SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => *i as usize,
                            SegmentValue::Last => 0,
                        };
                        style::palette(index).filled()
                    })
                    .margin(2)
                    .data(
                        frame
                            .values
                            .iter()
                            .enumerate()
                            .map(|(i, v)| (i as i32, v.to_f64().unwrap_or(0.0))),
                    ),
            )?;
        }

        draw_key(&key, &grid.categories)?;
        root.present()?;
        Ok(())
    }
}

/// Category color key along the bottom edge.
fn draw_key(
    area: &DrawingArea<SVGBackend<'_>, plotters::coord::Shift>,
    categories: &[String],
) -> Result<(), RenderError> {
    let (width, _) = area.dim_in_pixel();
    let y = (KEY_HEIGHT / 2) as i32;
    let step = (width as i32 / categories.len().max(1) as i32).max(60);
    for (index, category) in categories.iter().enumerate() {
        let x = 10 + step * index as i32;
        area.draw(&Rectangle::new(
            [(x, y - 5), (x + 10, y + 5)],
            style::palette(index).filled(),
        ))?;
        area.draw(&Text::new(
            style::short_label(category, 14),
            (x + 14, y - 6),
            style::tick_style(),
        ))?;
    }
    Ok(())
}
