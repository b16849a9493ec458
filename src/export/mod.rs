//! The export stage: every named result set of a run, one workbook.
//!
//! The workbook is built in memory, written next to its destination and
//! renamed into place, so a failed export never leaves a partial file at
//! the destination path.

pub mod bundle;
pub mod csv;
pub mod sheet;

pub use bundle::{MAX_SHEET_NAME, ReportBundle, sheet_name};
pub use csv::write_csv;
pub use sheet::{CellRange, SheetPlan, plan_sheet, write_sheet};

use crate::config::{ColorScale, NumericDetection};
use crate::error::ExportError;
use log::{debug, info};
use rust_xlsxwriter::Workbook;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// What a finished export produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkbookSummary {
    pub path: PathBuf,
    pub sheet_count: usize,
    pub total_rows: usize,
}

impl WorkbookSummary {
    /// The console line announcing the workbook.
    pub fn console_line(&self) -> String {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string());
        format!(
            "Created file {}, {} sheets, {} rows",
            name, self.sheet_count, self.total_rows
        )
    }
}

/// Formatting choices for the export stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
    pub detection: NumericDetection,
    pub color_scale: ColorScale,
}

/// Writes `bundle` as one workbook at `destination`, one sheet per entry in
/// insertion order.
pub fn export(
    bundle: &ReportBundle,
    destination: &Path,
    options: &ExportOptions,
) -> Result<WorkbookSummary, ExportError> {
    let mut workbook = Workbook::new();
    for (name, result) in bundle.iter() {
        let plan = plan_sheet(name, result, options.detection);
        debug!(
            "Sheet '{}': {} rows, color scale on columns {:?}",
            plan.name, plan.data_rows, plan.color_scale_columns
        );
        let worksheet = workbook.add_worksheet();
        write_sheet(worksheet, &plan, result, &options.color_scale)?;
    }

    let buffer = workbook.save_to_buffer()?;
    persist_atomically(&buffer, destination)?;

    let summary = WorkbookSummary {
        path: destination.to_path_buf(),
        sheet_count: bundle.len(),
        total_rows: bundle.total_rows(),
    };
    info!(
        "Wrote {} ({} sheets, {} rows)",
        destination.display(),
        summary.sheet_count,
        summary.total_rows
    );
    Ok(summary)
}

/// Writes `bytes` to a temporary file in the destination's directory and
/// renames it over `destination`.
fn persist_atomically(bytes: &[u8], destination: &Path) -> Result<(), ExportError> {
    let parent = match destination.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut staged = NamedTempFile::new_in(parent)?;
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;
    staged.persist(destination)?;
    Ok(())
}
