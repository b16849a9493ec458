//! Column-role resolution.

use crate::chart::{ChartKind, RoleBinding};
use crate::error::RenderError;
use tally_types::ResultSet;

/// Column indices a chart reads, after resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Roles {
    /// Label (or x) and value (or y).
    Pair { first: usize, second: usize },
    Single { column: usize },
    Triple {
        time: usize,
        category: usize,
        value: usize,
    },
}

/// Resolves which columns play which role for `kind`.
///
/// An explicit binding always wins. Without one, two-column charts take
/// columns 0 and 1 and refuse any other width, histograms read the last
/// column, and the animated chart needs exactly (time, category, value).
pub(crate) fn resolve(
    result: &ResultSet,
    kind: ChartKind,
    binding: Option<&RoleBinding>,
) -> Result<Roles, RenderError> {
    match binding {
        Some(binding) => resolve_bound(result, kind, binding),
        None => resolve_positional(result, kind),
    }
}

fn resolve_bound(
    result: &ResultSet,
    kind: ChartKind,
    binding: &RoleBinding,
) -> Result<Roles, RenderError> {
    let roles = match (kind, binding) {
        (
            ChartKind::Pie
            | ChartKind::Bar
            | ChartKind::HorizontalBar
            | ChartKind::Line
            | ChartKind::Scatter,
            RoleBinding::LabelValue {
                label: first,
                value: second,
            }
            | RoleBinding::XY {
                x: first,
                y: second,
            },
        ) => Roles::Pair {
            first: index_of(result, first)?,
            second: index_of(result, second)?,
        },
        (ChartKind::Histogram, RoleBinding::Single { column }) => Roles::Single {
            column: index_of(result, column)?,
        },
        (
            ChartKind::AnimatedBar,
            RoleBinding::TimeCategoryValue {
                time,
                category,
                value,
            },
        ) => Roles::Triple {
            time: index_of(result, time)?,
            category: index_of(result, category)?,
            value: index_of(result, value)?,
        },
        (kind, binding) => {
            return Err(RenderError::BindingMismatch {
                kind: kind.name(),
                binding: binding.name(),
            });
        }
    };
    Ok(roles)
}

fn resolve_positional(result: &ResultSet, kind: ChartKind) -> Result<Roles, RenderError> {
    let found = result.column_count();
    let ambiguous = || RenderError::AmbiguousShape {
        kind: kind.name(),
        found,
    };

    match kind {
        ChartKind::Pie
        | ChartKind::Bar
        | ChartKind::HorizontalBar
        | ChartKind::Line
        | ChartKind::Scatter => {
            if found != 2 {
                return Err(ambiguous());
            }
            Ok(Roles::Pair {
                first: 0,
                second: 1,
            })
        }
        ChartKind::Histogram => found
            .checked_sub(1)
            .map(|column| Roles::Single { column })
            .ok_or_else(ambiguous),
        ChartKind::AnimatedBar => {
            if found != 3 {
                return Err(ambiguous());
            }
            Ok(Roles::Triple {
                time: 0,
                category: 1,
                value: 2,
            })
        }
    }
}

fn index_of(result: &ResultSet, column: &str) -> Result<usize, RenderError> {
    result
        .column_index(column)
        .ok_or_else(|| RenderError::MissingColumn {
            column: column.to_string(),
            available: result.columns().join(", "),
        })
}
