//! Dense (time bucket x category) grids for the animated chart.

use super::collapse::OTHER_LABEL;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

/// One time bucket. `values[i]` belongs to `DenseGrid::categories[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridFrame {
    pub bucket: NaiveDate,
    pub values: Vec<Decimal>,
}

/// Every observed bucket crossed with every kept category, zero-filled.
///
/// Category order is fixed across frames: kept categories by overall total
/// descending, then "Other". Frames are in chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DenseGrid {
    pub categories: Vec<String>,
    pub frames: Vec<GridFrame>,
}

impl DenseGrid {
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number of (bucket, category) cells.
    pub fn cell_count(&self) -> usize {
        self.frames.len() * self.categories.len()
    }

    /// Largest value anywhere in the grid, zero for an empty grid.
    pub fn max_value(&self) -> Decimal {
        self.frames
            .iter()
            .flat_map(|frame| frame.values.iter().copied())
            .max()
            .unwrap_or(Decimal::ZERO)
            .max(Decimal::ZERO)
    }
}

/// One raw observation feeding the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub bucket: Option<NaiveDate>,
    pub category: Option<String>,
    pub value: Decimal,
}

/// Builds the dense grid, keeping the `limit` categories with the largest
/// overall totals (ties by first appearance).
///
/// Observations without a bucket are dropped. Observations without a
/// category, or with a category outside the kept set, are summed into
/// "Other". Repeated (bucket, category) pairs are summed.
pub fn dense_grid<I>(observations: I, limit: usize) -> DenseGrid
where
    I: IntoIterator<Item = Observation>,
{
    let observations: Vec<(NaiveDate, Option<String>, Decimal)> = observations
        .into_iter()
        .filter_map(|obs| obs.bucket.map(|bucket| (bucket, obs.category, obs.value)))
        .collect();
    if observations.is_empty() {
        return DenseGrid::default();
    }

    // (total, first seen) per real category
    let mut totals: HashMap<&str, (Decimal, usize)> = HashMap::new();
    for (position, (_, category, value)) in observations.iter().enumerate() {
        if let Some(name) = category.as_deref().filter(|name| *name != OTHER_LABEL) {
            let entry = totals.entry(name).or_insert((Decimal::ZERO, position));
            entry.0 += *value;
        }
    }

    let mut ranked: Vec<(&str, Decimal, usize)> = totals
        .into_iter()
        .map(|(name, (total, first))| (name, total, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked.truncate(limit);

    let mut categories: Vec<String> = ranked.iter().map(|(name, _, _)| name.to_string()).collect();
    categories.push(OTHER_LABEL.to_string());
    let other_index = categories.len() - 1;
    let index_of: HashMap<&str, usize> = ranked
        .iter()
        .enumerate()
        .map(|(i, (name, _, _))| (*name, i))
        .collect();

    let mut frames: BTreeMap<NaiveDate, Vec<Decimal>> = BTreeMap::new();
    for (bucket, category, value) in &observations {
        let column = category
            .as_deref()
            .and_then(|name| index_of.get(name).copied())
            .unwrap_or(other_index);
        let values = frames
            .entry(*bucket)
            .or_insert_with(|| vec![Decimal::ZERO; categories.len()]);
        values[column] += *value;
    }

    DenseGrid {
        frames: frames
            .into_iter()
            .map(|(bucket, values)| GridFrame { bucket, values })
            .collect(),
        categories,
    }
}
