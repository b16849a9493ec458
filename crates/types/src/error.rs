use thiserror::Error;

/// Structural problems with a result set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("row {row} has {found} cells but the header has {expected} columns")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),
}
