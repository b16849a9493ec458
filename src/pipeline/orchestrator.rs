// src/pipeline/orchestrator.rs
use super::console::{self, Console};
use super::section::{SNAPSHOT_QUERIES, Section, interactive_section, report_sections};
use crate::config::ReportConfig;
use crate::error::PipelineError;
use crate::export::{self, ExportOptions, ReportBundle, WorkbookSummary};
use crate::registry::{QueryDefinition, QueryRegistry};
use crate::render::interactive::{INTERACTIVE_FILENAME, InteractiveRenderer};
use crate::render::{RenderRecord, Renderer};
use crate::shape;
use log::{debug, info, warn};
use std::path::PathBuf;
use std::time::Instant;
use tally_source::DataSource;
use tally_types::ResultSet;

/// What a full report run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub records: Vec<RenderRecord>,
    pub workbook: WorkbookSummary,
}

/// Artifacts of the interactive stage. Both are `None` when the query
/// returned no rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractiveOutput {
    pub page: Option<PathBuf>,
    pub faceted: Option<PathBuf>,
}

/// One CSV written by the snapshot stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotFile {
    pub query: &'static str,
    pub path: PathBuf,
    pub rows: usize,
}

/// Runs report stages against one data source.
///
/// Queries run strictly one after another. The data source is owned here
/// and released when the pipeline is dropped.
pub struct ReportPipeline {
    config: ReportConfig,
    registry: QueryRegistry,
    source: Box<dyn DataSource>,
    console: Console,
    open_viewer: bool,
}

impl ReportPipeline {
    pub(super) fn new(
        config: ReportConfig,
        registry: QueryRegistry,
        source: Box<dyn DataSource>,
        console: Console,
        open_viewer: bool,
    ) -> Self {
        Self {
            config,
            registry,
            source,
            console,
            open_viewer,
        }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Runs every report section in order, then writes the workbook once.
    ///
    /// A failing section aborts the run. Charts written by earlier sections
    /// stay on disk; no workbook is written.
    pub fn run_all(&mut self) -> Result<RunSummary, PipelineError> {
        let started = Instant::now();
        let sections = report_sections(&self.config);
        info!("Running {} report sections", sections.len());

        let mut bundle = ReportBundle::new();
        let mut records = Vec::with_capacity(sections.len());
        for section in &sections {
            let (name, result, record) = self.run_section(section)?;
            self.console.line(&console::section_line(&record, &section.chart));
            bundle.insert(name, result);
            records.push(record);
        }

        let options = ExportOptions {
            detection: self.config.numeric_detection,
            color_scale: self.config.color_scale,
        };
        let workbook = export::export(&bundle, &self.config.workbook_path(), &options)?;
        self.console.line(&workbook.console_line());

        info!("Report finished in {:.2?}", started.elapsed());
        Ok(RunSummary { records, workbook })
    }

    fn run_section(
        &mut self,
        section: &Section,
    ) -> Result<(&'static str, ResultSet, RenderRecord), PipelineError> {
        let definition = *self.registry.get(section.query.name())?;
        let result = self.fetch(&definition)?;
        let normalized = shape::normalize(&result, &section.chart)?;
        let record = Renderer::for_spec(&section.chart).render(
            &normalized,
            &section.chart,
            &self.config.charts_dir,
            section.insight,
        )?;
        Ok((definition.name, result, record))
    }

    /// Writes the interactive monthly GMV page plus its static faceted chart,
    /// and opens the page in the system viewer when enabled.
    pub fn interactive(&mut self) -> Result<InteractiveOutput, PipelineError> {
        let section = interactive_section(&self.config);
        let definition = *self.registry.get(section.query.name())?;
        let result = self.fetch(&definition)?;
        let normalized = shape::normalize(&result, &section.chart)?;

        let destination = self.config.charts_dir.join(INTERACTIVE_FILENAME);
        let page_title = format!("{} (interactive)", section.chart.title);
        let Some(page) =
            InteractiveRenderer::default().render(&normalized, &page_title, &destination)?
        else {
            self.console.line(console::NO_INTERACTIVE_DATA);
            return Ok(InteractiveOutput::default());
        };

        let record = Renderer::for_spec(&section.chart).render(
            &normalized,
            &section.chart,
            &self.config.charts_dir,
            section.insight,
        )?;
        self.console.line(&console::section_line(&record, &section.chart));
        self.console.line(&format!("Interactive chart → {}", page.display()));

        if self.open_viewer {
            match opener::open(&page) {
                Ok(()) => debug!("Opened {}", page.display()),
                Err(e) => warn!("Could not open {}: {}", page.display(), e),
            }
        }

        Ok(InteractiveOutput {
            page: Some(page),
            faceted: Some(record.artifact_path),
        })
    }

    /// Previews and writes the snapshot queries as CSV files.
    pub fn snapshot(&mut self) -> Result<Vec<SnapshotFile>, PipelineError> {
        let mut files = Vec::with_capacity(SNAPSHOT_QUERIES.len());
        for id in SNAPSHOT_QUERIES {
            let definition = *self.registry.get(id.name())?;
            let result = self.fetch(&definition)?;

            self.console.line(&format!("\n=== {} ===", definition.name));
            self.console.line(&console::preview(&result));

            let path = self
                .config
                .exports_dir
                .join(format!("{}.csv", definition.name));
            let rows = export::write_csv(&result, &path)?;
            self.console.line(&console::saved_line(&path, rows));
            files.push(SnapshotFile {
                query: definition.name,
                path,
                rows,
            });
        }
        Ok(files)
    }

    /// Executes one registered query and checks its header.
    fn fetch(&mut self, definition: &QueryDefinition) -> Result<ResultSet, PipelineError> {
        let started = Instant::now();
        let result = self.source.execute(definition.sql)?;
        debug!(
            "Query '{}' returned {} rows in {:.2?}",
            definition.name,
            result.len(),
            started.elapsed()
        );

        let missing = definition.missing_columns(&result);
        if !missing.is_empty() {
            warn!(
                "Query '{}' did not return expected columns {:?} (got {:?})",
                definition.name,
                missing,
                result.columns()
            );
        }
        Ok(result)
    }
}

impl std::fmt::Debug for ReportPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportPipeline")
            .field("config", &self.config)
            .field("source", &self.source.describe())
            .field("open_viewer", &self.open_viewer)
            .finish()
    }
}
