// src/error.rs
use tally_source::DataSourceError;
use tally_types::ShapeError;
use thiserror::Error;

/// Failures while turning a result set into a chart.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("column '{column}' not found (available: {available})")]
    MissingColumn { column: String, available: String },

    #[error("cannot infer column roles for a {kind} chart from {found} columns; bind them explicitly")]
    AmbiguousShape { kind: &'static str, found: usize },

    #[error("a {binding} binding cannot drive a {kind} chart")]
    BindingMismatch {
        kind: &'static str,
        binding: &'static str,
    },

    #[error("the {strategy} renderer cannot draw data normalized for a {kind} chart")]
    SeriesMismatch {
        strategy: &'static str,
        kind: &'static str,
    },

    #[error("malformed result set: {0}")]
    Shape(#[from] ShapeError),

    #[error("drawing backend error: {0}")]
    Backend(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl<E> From<plotters::drawing::DrawingAreaErrorKind<E>> for RenderError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        RenderError::Backend(err.to_string())
    }
}

/// Failures while writing the workbook or CSV snapshots.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("workbook error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not move workbook into place: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// A comprehensive error type for one report run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Unknown query: {0}")]
    UnknownQuery(String),

    #[error("Data source failed: {0}")]
    DataSource(#[from] DataSourceError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("Configuration is invalid: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// The pipeline stage the failure belongs to, for console reporting.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::UnknownQuery(_) => "registry",
            PipelineError::DataSource(_) => "query",
            PipelineError::Render(_) => "render",
            PipelineError::Export(_) => "export",
            PipelineError::Config(_) => "config",
            PipelineError::Io(_) => "io",
        }
    }
}

impl From<config::ConfigError> for PipelineError {
    fn from(e: config::ConfigError) -> Self {
        PipelineError::Config(e.to_string())
    }
}
