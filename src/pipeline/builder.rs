// src/pipeline/builder.rs
use super::console::Console;
use super::orchestrator::ReportPipeline;
use crate::config::ReportConfig;
use crate::error::PipelineError;
use crate::registry::QueryRegistry;
use std::io::Write;
use std::path::PathBuf;
use tally_source::DataSource;

/// A builder for creating a [`ReportPipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    config: ReportConfig,
    registry: Option<QueryRegistry>,
    source: Option<Box<dyn DataSource>>,
    console: Option<Console>,
    open_viewer: Option<bool>,
}

impl PipelineBuilder {
    /// Creates a builder with default settings and no data source.
    pub fn new() -> Self {
        Default::default()
    }

    /// Replaces the whole report configuration.
    pub fn with_config(mut self, config: ReportConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_registry(mut self, registry: QueryRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// The store every query runs against. Required.
    pub fn with_data_source(mut self, source: impl DataSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn with_charts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.charts_dir = dir.into();
        self
    }

    pub fn with_exports_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.exports_dir = dir.into();
        self
    }

    /// Redirects progress lines, e.g. into a buffer in tests.
    pub fn with_console(mut self, out: impl Write + 'static) -> Self {
        self.console = Some(Console::new(out));
        self
    }

    /// Whether the interactive page is opened once written. Overrides
    /// `open_interactive` from the configuration.
    pub fn with_viewer(mut self, open: bool) -> Self {
        self.open_viewer = Some(open);
        self
    }

    /// Consumes the builder and creates the [`ReportPipeline`].
    pub fn build(self) -> Result<ReportPipeline, PipelineError> {
        let source = self.source.ok_or_else(|| {
            PipelineError::Config(
                "No data source has been configured. Use `with_data_source`.".to_string(),
            )
        })?;
        log::info!("Building report pipeline over {}", source.describe());

        let open_viewer = self.open_viewer.unwrap_or(self.config.open_interactive);
        Ok(ReportPipeline::new(
            self.config,
            self.registry.unwrap_or_default(),
            source,
            self.console.unwrap_or_default(),
            open_viewer,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_source::StaticDataSource;

    #[test]
    fn data_source_is_required() {
        let err = PipelineBuilder::new().build().unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn directory_overrides_reach_the_config() {
        let pipeline = PipelineBuilder::new()
            .with_data_source(StaticDataSource::new())
            .with_charts_dir("out/charts")
            .with_exports_dir("out/exports")
            .build()
            .unwrap();
        assert_eq!(pipeline.config().charts_dir, PathBuf::from("out/charts"));
        assert_eq!(
            pipeline.config().workbook_path(),
            PathBuf::from("out/exports/olist_summary.xlsx")
        );
    }
}
