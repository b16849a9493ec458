use std::time::Duration;
use thiserror::Error;

/// Failures surfaced by a data source. None of them are retried here;
/// every report query is read-only, so the caller may simply rerun.
#[derive(Error, Debug)]
pub enum DataSourceError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("query did not finish within {0:?}")]
    Timeout(Duration),

    #[error("column '{column}' has unsupported type {type_name}")]
    UnsupportedType { column: String, type_name: String },

    #[error("no result registered for query: {0}")]
    MissingResult(String),

    #[error("result shape error: {0}")]
    Shape(#[from] tally_types::ShapeError),

    #[error("runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}
