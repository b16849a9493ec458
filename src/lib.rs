//! Batch reporting over a fixed set of analytical queries.
//!
//! One run executes the registered queries against a [`DataSource`],
//! normalizes each result for its chart, draws the chart, and finally writes
//! every result set into one formatted workbook.
//!
//! ```ignore
//! use tally::{PipelineBuilder, ReportConfig};
//! use tally_source::StaticDataSource;
//!
//! let mut pipeline = PipelineBuilder::new()
//!     .with_config(ReportConfig::load()?)
//!     .with_data_source(StaticDataSource::new())
//!     .build()?;
//! pipeline.run_all()?;
//! ```

pub mod chart;
pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod pipeline;
pub mod registry;
pub mod render;
pub mod shape;

pub use chart::{ChartKind, ChartSpec, RoleBinding};
pub use config::{ColorScale, NumericDetection, ReportConfig};
pub use error::{ExportError, PipelineError, RenderError};
pub use export::{ExportOptions, ReportBundle, WorkbookSummary, export};
pub use pipeline::{InteractiveOutput, PipelineBuilder, ReportPipeline, RunSummary, SnapshotFile};
pub use registry::{ColumnRole, ColumnSpec, QueryDefinition, QueryId, QueryRegistry};
pub use render::{RenderRecord, Renderer, RenderingStrategy};
pub use shape::{NormalizedResultSet, Series, normalize};

pub use tally_source::{DataSource, DataSourceError, StaticDataSource};
pub use tally_types::{Color, ResultSet, Value};
