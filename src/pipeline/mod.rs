//! Report orchestration.
//!
//! - [`PipelineBuilder`]: fluent builder over configuration and data source
//! - [`ReportPipeline`]: runs the report, interactive and snapshot stages
//! - [`section`]: the fixed report sections
//!
//! # Example
//!
//! ```ignore
//! use tally::PipelineBuilder;
//! use tally_source::{ConnectionConfig, PostgresDataSource};
//!
//! let source = PostgresDataSource::connect(&ConnectionConfig::from_env())?;
//! let mut pipeline = PipelineBuilder::new()
//!     .with_data_source(source)
//!     .build()?;
//!
//! let summary = pipeline.run_all()?;
//! println!("{}", summary.workbook.console_line());
//! ```

mod builder;
pub mod console;
mod orchestrator;
pub mod section;

pub use builder::PipelineBuilder;
pub use console::Console;
pub use orchestrator::{InteractiveOutput, ReportPipeline, RunSummary, SnapshotFile};
pub use section::{SNAPSHOT_QUERIES, Section, interactive_section, report_sections};
