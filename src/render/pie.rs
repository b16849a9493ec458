//! Pie chart with an external legend.

use super::{RenderingStrategy, draw_empty, style, unexpected_series};
use crate::error::RenderError;
use crate::format::thousands_decimal;
use crate::shape::{CategoryValue, NormalizedResultSet, Series};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use rust_decimal::prelude::ToPrimitive;
use std::f64::consts::{FRAC_PI_2, TAU};
use std::path::Path;

/// One wedge, angles in radians measured counter-clockwise from east.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub legend: String,
    /// Percentage of the total.
    pub share: f64,
    pub start: f64,
    pub sweep: f64,
}

impl Slice {
    fn mid_angle(&self) -> f64 {
        self.start - self.sweep / 2.0
    }
}

/// Draws slices in input order, clockwise from twelve o'clock.
#[derive(Debug, Clone, PartialEq)]
pub struct PieRenderer {
    /// Slices below this share (percent) get no inline label. They stay in
    /// the legend.
    pub label_threshold: f64,
}

impl Default for PieRenderer {
    fn default() -> Self {
        Self {
            label_threshold: 3.0,
        }
    }
}

impl PieRenderer {
    /// Whether a slice is large enough to carry its percentage inline.
    pub fn labels_slice(&self, slice: &Slice) -> bool {
        slice.share >= self.label_threshold
    }
}

/// Lays out wedges for `rows`. Negative values draw as empty wedges, and an
/// all-zero input has no slices.
pub fn slices(rows: &[CategoryValue]) -> Vec<Slice> {
    let values: Vec<f64> = rows
        .iter()
        .map(|row| row.value.to_f64().unwrap_or(0.0).max(0.0))
        .collect();
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut start = FRAC_PI_2;
    rows.iter()
        .zip(values)
        .map(|(row, value)| {
            let sweep = value / total * TAU;
            let slice = Slice {
                label: row.label.clone(),
                legend: format!("{} — {}", row.label, thousands_decimal(row.value, 0)),
                share: value / total * 100.0,
                start,
                sweep,
            };
            start -= sweep;
            slice
        })
        .collect()
}

impl RenderingStrategy for PieRenderer {
    fn draw(
        &self,
        data: &NormalizedResultSet,
        title: &str,
        destination: &Path,
    ) -> Result<(), RenderError> {
        let Series::Categories(rows) = &data.series else {
            return Err(unexpected_series("pie", data));
        };

        let root = SVGBackend::new(destination, style::PIE_CANVAS).into_drawing_area();
        root.fill(&WHITE)?;

        let slices = slices(rows);
        if slices.is_empty() {
            draw_empty(&root, title)?;
            root.present()?;
            return Ok(());
        }

        let area = root.titled(title, style::title_style())?;
        let (width, _) = area.dim_in_pixel();
        let (plot, legend) = area.split_horizontally(width * 3 / 5);

        let (plot_w, plot_h) = plot.dim_in_pixel();
        let center = ((plot_w / 2) as i32, (plot_h / 2) as i32);
        let radius = f64::from(plot_w.min(plot_h)) * 0.42;

        let centered = style::tick_style().pos(Pos::new(HPos::Center, VPos::Center));
        for (index, slice) in slices.iter().enumerate() {
            let color = style::palette(index);
            let outline = wedge(center, radius, slice);
            plot.draw(&Polygon::new(outline.clone(), color.filled()))?;
            plot.draw(&PathElement::new(outline, WHITE.stroke_width(1)))?;

            if self.labels_slice(slice) {
                let at = polar(center, radius * 0.8, slice.mid_angle());
                plot.draw(&Text::new(
                    format!("{:.1}%", slice.share),
                    at,
                    centered.clone(),
                ))?;
            }
        }

        draw_legend(&legend, &data.axis.x, &data.axis.y, &slices)?;
        root.present()?;
        Ok(())
    }
}

fn draw_legend(
    area: &DrawingArea<SVGBackend<'_>, plotters::coord::Shift>,
    label_name: &str,
    value_name: &str,
    slices: &[Slice],
) -> Result<(), RenderError> {
    let row_height = 22;
    let left = 10;
    let mut y = 40;

    area.draw(&Text::new(
        format!("{} — {}", label_name, value_name),
        (left, y),
        style::label_style(),
    ))?;
    y += row_height + 6;

    let text = style::tick_style().pos(Pos::new(HPos::Left, VPos::Center));
    for (index, slice) in slices.iter().enumerate() {
        area.draw(&Rectangle::new(
            [(left, y - 6), (left + 12, y + 6)],
            style::palette(index).filled(),
        ))?;
        area.draw(&Text::new(slice.legend.clone(), (left + 20, y), text.clone()))?;
        y += row_height;
    }
    Ok(())
}

/// Outline of one wedge: the center, then points along the arc.
fn wedge(center: (i32, i32), radius: f64, slice: &Slice) -> Vec<(i32, i32)> {
    let steps = ((slice.sweep.to_degrees()).ceil() as usize).max(2);
    let mut points = Vec::with_capacity(steps + 2);
    points.push(center);
    for step in 0..=steps {
        let angle = slice.start - slice.sweep * step as f64 / steps as f64;
        points.push(polar(center, radius, angle));
    }
    points
}

/// Pixel position at `angle` (counter-clockwise from east) on a circle.
/// Pixel rows grow downwards, hence the subtraction.
fn polar(center: (i32, i32), radius: f64, angle: f64) -> (i32, i32) {
    (
        center.0 + (radius * angle.cos()).round() as i32,
        center.1 - (radius * angle.sin()).round() as i32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn rows(values: &[i64]) -> Vec<CategoryValue> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| CategoryValue::new(format!("c{i}"), Decimal::from(*v)))
            .collect()
    }

    #[test]
    fn slices_follow_input_order_clockwise_from_the_top() {
        let slices = slices(&rows(&[50, 25, 25]));
        assert_eq!(slices.len(), 3);
        assert!((slices[0].start - FRAC_PI_2).abs() < 1e-9);
        assert!((slices[0].share - 50.0).abs() < 1e-9);
        assert!((slices[1].start - (FRAC_PI_2 - std::f64::consts::PI)).abs() < 1e-9);
        assert_eq!(slices[2].label, "c2");
    }

    #[test]
    fn small_slices_lose_their_inline_label_but_keep_a_legend() {
        let renderer = PieRenderer::default();
        let slices = slices(&rows(&[980, 20, 3000]));
        assert!(renderer.labels_slice(&slices[0]));
        assert!(!renderer.labels_slice(&slices[1]));
        assert_eq!(slices[1].legend, "c1 — 20");
        assert_eq!(slices[2].legend, "c2 — 3,000");
    }

    #[test]
    fn all_zero_input_has_no_slices() {
        assert!(slices(&rows(&[0, 0])).is_empty());
        assert!(slices(&[]).is_empty());
    }

    #[test]
    fn wedge_starts_at_the_center() {
        let slice = &slices(&rows(&[1, 1]))[0];
        let points = wedge((100, 100), 50.0, slice);
        assert_eq!(points[0], (100, 100));
        assert_eq!(points[1], (100, 50));
        assert_eq!(*points.last().unwrap(), (100, 150));
    }
}
