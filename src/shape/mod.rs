//! Shape normalization: from a raw [`ResultSet`] to the series a chart draws.
//!
//! Normalizing never mutates the result set. Column roles are resolved once
//! (see [`roles`]), time axes are coerced to dates, and categorical charts
//! are collapsed to their display limit.

pub mod collapse;
mod dates;
pub mod grid;
mod roles;

pub use collapse::{CategoryValue, OTHER_LABEL, collapse_top_n};
pub use dates::coerce_date;
pub use grid::{DenseGrid, GridFrame, Observation, dense_grid};

use crate::chart::{ChartKind, ChartSpec};
use crate::error::RenderError;
use chrono::NaiveDate;
use log::debug;
use roles::Roles;
use rust_decimal::Decimal;
use tally_types::{ResultSet, Value};

/// Default category limit for the animated chart when the spec sets none.
pub const DEFAULT_GRID_LIMIT: usize = 8;

/// Axis captions, taken from the resolved column names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AxisLabels {
    pub x: String,
    pub y: String,
}

/// One point on a time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimePoint {
    pub at: NaiveDate,
    pub value: Decimal,
}

/// The drawable data, one variant per family of charts.
#[derive(Debug, Clone, PartialEq)]
pub enum Series {
    /// Pie and bar charts, in display order.
    Categories(Vec<CategoryValue>),
    /// Line charts, in source order. Gaps between dates are not filled.
    Timeline(Vec<TimePoint>),
    /// Histogram input.
    Samples(Vec<f64>),
    /// Scatter input.
    Points(Vec<(f64, f64)>),
    /// Animated chart input.
    Grid(DenseGrid),
}

impl Series {
    pub fn is_empty(&self) -> bool {
        match self {
            Series::Categories(rows) => rows.is_empty(),
            Series::Timeline(points) => points.is_empty(),
            Series::Samples(samples) => samples.is_empty(),
            Series::Points(points) => points.is_empty(),
            Series::Grid(grid) => grid.is_empty(),
        }
    }
}

/// A result set in the form one chart kind consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedResultSet {
    pub kind: ChartKind,
    /// Rows in the raw result set, before any collapsing or skipping.
    pub row_count: usize,
    pub axis: AxisLabels,
    pub series: Series,
}

/// Normalizes `result` for the chart described by `spec`.
pub fn normalize(result: &ResultSet, spec: &ChartSpec) -> Result<NormalizedResultSet, RenderError> {
    let roles = roles::resolve(result, spec.kind, spec.binding.as_ref())?;
    let name = |index: usize| result.columns()[index].clone();

    let (axis, series) = match (spec.kind, roles) {
        (
            ChartKind::Pie | ChartKind::Bar | ChartKind::HorizontalBar,
            Roles::Pair { first, second },
        ) => {
            let rows = categories(result, first, second);
            let rows = match spec.top_n {
                Some(limit) => collapse_top_n(rows, limit),
                None => rows,
            };
            (axis(name(first), name(second)), Series::Categories(rows))
        }
        (ChartKind::Line, Roles::Pair { first, second }) => (
            axis(name(first), name(second)),
            Series::Timeline(timeline(result, first, second)),
        ),
        (ChartKind::Scatter, Roles::Pair { first, second }) => (
            axis(name(first), name(second)),
            Series::Points(points(result, first, second)),
        ),
        (ChartKind::Histogram, Roles::Single { column }) => (
            axis(name(column), "count".to_string()),
            Series::Samples(samples(result, column)),
        ),
        (
            ChartKind::AnimatedBar,
            Roles::Triple {
                time,
                category,
                value,
            },
        ) => {
            let limit = spec.top_n.unwrap_or(DEFAULT_GRID_LIMIT);
            let grid = dense_grid(observations(result, time, category, value), limit);
            (axis(name(category), name(value)), Series::Grid(grid))
        }
        (kind, _) => {
            return Err(RenderError::AmbiguousShape {
                kind: kind.name(),
                found: result.column_count(),
            });
        }
    };

    debug!(
        "Normalized {} rows of '{}' for a {} chart",
        result.len(),
        spec.title,
        spec.kind
    );

    Ok(NormalizedResultSet {
        kind: spec.kind,
        row_count: result.len(),
        axis,
        series,
    })
}

/// Reads the (time, category, value) observations of a result set.
pub fn observations(
    result: &ResultSet,
    time: usize,
    category: usize,
    value: usize,
) -> Vec<Observation> {
    result
        .rows()
        .iter()
        .map(|row| Observation {
            bucket: coerce_date(&row[time]),
            category: match &row[category] {
                Value::Null => None,
                other => Some(other.to_string()),
            },
            value: measure(&row[value]),
        })
        .collect()
}

fn axis(x: String, y: String) -> AxisLabels {
    AxisLabels { x, y }
}

/// Null and non-numeric measures count as zero.
fn measure(value: &Value) -> Decimal {
    value.as_decimal().unwrap_or(Decimal::ZERO)
}

fn categories(result: &ResultSet, label: usize, value: usize) -> Vec<CategoryValue> {
    result
        .rows()
        .iter()
        .map(|row| CategoryValue::new(row[label].to_string(), measure(&row[value])))
        .collect()
}

fn timeline(result: &ResultSet, x: usize, y: usize) -> Vec<TimePoint> {
    result
        .rows()
        .iter()
        .filter_map(|row| {
            let at = coerce_date(&row[x])?;
            let value = row[y].as_decimal()?;
            Some(TimePoint { at, value })
        })
        .collect()
}

fn points(result: &ResultSet, x: usize, y: usize) -> Vec<(f64, f64)> {
    result
        .rows()
        .iter()
        .filter_map(|row| Some((finite(&row[x])?, finite(&row[y])?)))
        .collect()
}

fn samples(result: &ResultSet, column: usize) -> Vec<f64> {
    result.column(column).filter_map(finite).collect()
}

fn finite(value: &Value) -> Option<f64> {
    value.as_f64().filter(|x| x.is_finite())
}
