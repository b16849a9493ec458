//! Top-N categorical collapsing.

use rust_decimal::Decimal;

/// Label of the synthetic bucket that absorbs collapsed categories.
pub const OTHER_LABEL: &str = "Other";

/// One labelled measure on a categorical axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryValue {
    pub label: String,
    pub value: Decimal,
}

impl CategoryValue {
    pub fn new(label: impl Into<String>, value: Decimal) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }

    fn is_other(&self) -> bool {
        self.label == OTHER_LABEL
    }
}

/// Keeps the `limit` highest-valued categories and sums the rest into a
/// single "Other" row.
///
/// With at most `limit` real categories the input comes back untouched, in
/// its original order. Otherwise ranking is by value descending with ties
/// kept in input order, and the final rows are re-sorted by value so "Other"
/// lands where its sum belongs (after any kept row of equal value). A row
/// already labelled "Other" is folded into the bucket, never ranked.
pub fn collapse_top_n(rows: Vec<CategoryValue>, limit: usize) -> Vec<CategoryValue> {
    let ranked_count = rows.iter().filter(|row| !row.is_other()).count();
    if ranked_count <= limit {
        return rows;
    }

    let (existing_other, mut ranked): (Vec<_>, Vec<_>) =
        rows.into_iter().partition(CategoryValue::is_other);

    ranked.sort_by(|a, b| b.value.cmp(&a.value));
    let collapsed = ranked.split_off(limit);

    let other_total: Decimal = collapsed
        .iter()
        .chain(existing_other.iter())
        .map(|row| row.value)
        .sum();

    ranked.push(CategoryValue::new(OTHER_LABEL, other_total));
    ranked.sort_by(|a, b| b.value.cmp(&a.value));
    ranked
}
