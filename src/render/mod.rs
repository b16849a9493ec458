// src/render/mod.rs
//!
//! Chart rendering strategies.
//!
//! Every static strategy draws one SVG file from a [`NormalizedResultSet`],
//! overwriting whatever was at the destination. [`Renderer`] dispatches to
//! the strategy matching a [`ChartKind`]; the interactive chart has its own
//! entry point in [`interactive`].

use crate::chart::{ChartKind, ChartSpec};
use crate::error::RenderError;
use crate::shape::NormalizedResultSet;
use log::debug;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::fs;
use std::path::{Path, PathBuf};

pub mod bar;
pub mod faceted;
pub mod histogram;
pub mod interactive;
pub mod line;
pub mod pie;
pub mod scatter;
pub mod style;

pub use bar::{BarRenderer, Orientation};
pub use faceted::FacetedBarRenderer;
pub use histogram::{HistogramBin, HistogramRenderer, histogram_bins};
pub use line::LineRenderer;
pub use pie::PieRenderer;
pub use scatter::ScatterRenderer;

/// Default bin count for histograms whose spec sets none.
pub const DEFAULT_BINS: usize = 20;

/// What one render call produced, for the console report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRecord {
    pub row_count: usize,
    pub artifact_path: PathBuf,
    pub insight: String,
}

/// A trait for components that draw one normalized result set to an image file.
pub trait RenderingStrategy {
    /// Draws `data` with `title` and writes the image to `destination`.
    fn draw(
        &self,
        data: &NormalizedResultSet,
        title: &str,
        destination: &Path,
    ) -> Result<(), RenderError>;
}

/// An enum for static dispatch of [`RenderingStrategy`] implementations.
#[derive(Debug, Clone)]
pub enum Renderer {
    Pie(PieRenderer),
    Bar(BarRenderer),
    Line(LineRenderer),
    Histogram(HistogramRenderer),
    Scatter(ScatterRenderer),
    Faceted(FacetedBarRenderer),
}

impl Renderer {
    /// The strategy for a chart spec.
    pub fn for_spec(spec: &ChartSpec) -> Self {
        match spec.kind {
            ChartKind::Pie => Renderer::Pie(PieRenderer::default()),
            ChartKind::Bar => Renderer::Bar(BarRenderer::new(Orientation::Vertical)),
            ChartKind::HorizontalBar => Renderer::Bar(BarRenderer::new(Orientation::Horizontal)),
            ChartKind::Line => Renderer::Line(LineRenderer),
            ChartKind::Histogram => Renderer::Histogram(HistogramRenderer::new(
                spec.bins.unwrap_or(DEFAULT_BINS),
            )),
            ChartKind::Scatter => Renderer::Scatter(ScatterRenderer),
            ChartKind::AnimatedBar => Renderer::Faceted(FacetedBarRenderer::default()),
        }
    }

    /// Draws `data` under `charts_dir` and returns the record for the console.
    ///
    /// The directory is created on demand. An empty series still produces a
    /// (blank) chart.
    pub fn render(
        &self,
        data: &NormalizedResultSet,
        spec: &ChartSpec,
        charts_dir: &Path,
        insight: &str,
    ) -> Result<RenderRecord, RenderError> {
        fs::create_dir_all(charts_dir)?;
        let destination = charts_dir.join(&spec.filename);
        debug!("Drawing {} chart '{}' to {}", spec.kind, spec.title, destination.display());

        self.draw(data, &spec.title, &destination)?;

        Ok(RenderRecord {
            row_count: data.row_count,
            artifact_path: destination,
            insight: insight.to_string(),
        })
    }
}

impl RenderingStrategy for Renderer {
    fn draw(
        &self,
        data: &NormalizedResultSet,
        title: &str,
        destination: &Path,
    ) -> Result<(), RenderError> {
        match self {
            Renderer::Pie(r) => r.draw(data, title, destination),
            Renderer::Bar(r) => r.draw(data, title, destination),
            Renderer::Line(r) => r.draw(data, title, destination),
            Renderer::Histogram(r) => r.draw(data, title, destination),
            Renderer::Scatter(r) => r.draw(data, title, destination),
            Renderer::Faceted(r) => r.draw(data, title, destination),
        }
    }
}

/// Draws the title and a "No data" notice; used for empty series.
pub(crate) fn draw_empty(
    root: &DrawingArea<SVGBackend<'_>, Shift>,
    title: &str,
) -> Result<(), RenderError> {
    let area = root.titled(title, style::title_style())?;
    let (width, height) = area.dim_in_pixel();
    let notice = style::label_style().pos(Pos::new(HPos::Center, VPos::Center));
    area.draw(&Text::new(
        "No data",
        ((width / 2) as i32, (height / 2) as i32),
        notice,
    ))?;
    Ok(())
}

/// Rejects a series that does not match the strategy it was handed to.
pub(crate) fn unexpected_series(strategy: &'static str, data: &NormalizedResultSet) -> RenderError {
    RenderError::SeriesMismatch {
        strategy,
        kind: data.kind.name(),
    }
}
