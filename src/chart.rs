// src/chart.rs
//! Chart intents: what a report section wants drawn, and from which columns.

use std::fmt;

/// The rendering strategies a section can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Pie,
    Bar,
    HorizontalBar,
    Line,
    Histogram,
    Scatter,
    AnimatedBar,
}

impl ChartKind {
    pub fn name(self) -> &'static str {
        match self {
            ChartKind::Pie => "pie",
            ChartKind::Bar => "bar",
            ChartKind::HorizontalBar => "horizontal-bar",
            ChartKind::Line => "line",
            ChartKind::Histogram => "histogram",
            ChartKind::Scatter => "scatter",
            ChartKind::AnimatedBar => "animated-bar",
        }
    }

    /// Short label used in the per-section console line.
    pub fn console_label(self) -> &'static str {
        match self {
            ChartKind::Pie => "pie",
            ChartKind::Bar => "bar",
            ChartKind::HorizontalBar => "horizontal bar",
            ChartKind::Line => "line",
            ChartKind::Histogram => "hist",
            ChartKind::Scatter => "scatter",
            ChartKind::AnimatedBar => "animated bar",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Explicit column-role bindings. When a chart carries none, roles are
/// resolved positionally and only for unambiguous shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleBinding {
    LabelValue { label: String, value: String },
    XY { x: String, y: String },
    Single { column: String },
    TimeCategoryValue {
        time: String,
        category: String,
        value: String,
    },
}

impl RoleBinding {
    pub fn label_value(label: impl Into<String>, value: impl Into<String>) -> Self {
        RoleBinding::LabelValue {
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn xy(x: impl Into<String>, y: impl Into<String>) -> Self {
        RoleBinding::XY {
            x: x.into(),
            y: y.into(),
        }
    }

    pub fn single(column: impl Into<String>) -> Self {
        RoleBinding::Single {
            column: column.into(),
        }
    }

    pub fn time_category_value(
        time: impl Into<String>,
        category: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        RoleBinding::TimeCategoryValue {
            time: time.into(),
            category: category.into(),
            value: value.into(),
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            RoleBinding::LabelValue { .. } => "label/value",
            RoleBinding::XY { .. } => "x/y",
            RoleBinding::Single { .. } => "single column",
            RoleBinding::TimeCategoryValue { .. } => "time/category/value",
        }
    }
}

/// One chart to draw. Built per report section and consumed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    /// File name under the charts directory.
    pub filename: String,
    pub binding: Option<RoleBinding>,
    /// Category display limit; rows past it collapse into "Other".
    pub top_n: Option<usize>,
    pub bins: Option<usize>,
}

impl ChartSpec {
    pub fn new(kind: ChartKind, title: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            filename: filename.into(),
            binding: None,
            top_n: None,
            bins: None,
        }
    }

    pub fn with_binding(mut self, binding: RoleBinding) -> Self {
        self.binding = Some(binding);
        self
    }

    pub fn with_top_n(mut self, limit: usize) -> Self {
        self.top_n = Some(limit);
        self
    }

    pub fn with_bins(mut self, bins: usize) -> Self {
        self.bins = Some(bins);
        self
    }
}
