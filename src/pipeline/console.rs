//! Human-facing progress lines.
//!
//! Console output is best effort: a failed write never aborts a run.

use crate::chart::ChartSpec;
use crate::format::thousands;
use crate::render::RenderRecord;
use itertools::Itertools;
use std::io::{self, Write};
use std::path::Path;
use tally_types::ResultSet;

/// Rows shown by [`preview`].
pub const PREVIEW_ROWS: usize = 10;

pub const NO_INTERACTIVE_DATA: &str = "No data for interactive slider.";

/// Where progress lines go. Defaults to stdout.
pub struct Console {
    out: Box<dyn Write>,
}

impl Default for Console {
    fn default() -> Self {
        Self::new(io::stdout())
    }
}

impl Console {
    pub fn new(out: impl Write + 'static) -> Self {
        Self { out: Box::new(out) }
    }

    /// Writes one line, ignoring write errors.
    pub fn line(&mut self, text: &str) {
        let _ = writeln!(self.out, "{}", text);
        let _ = self.out.flush();
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Console")
    }
}

/// `Generated 1,234 rows → pie 'Title' → saved to charts/x.svg → insight`
pub fn section_line(record: &RenderRecord, chart: &ChartSpec) -> String {
    format!(
        "Generated {} rows → {} '{}' → saved to {} → {}",
        thousands(record.row_count as u64),
        chart.kind.console_label(),
        chart.title,
        record.artifact_path.display(),
        record.insight
    )
}

pub fn saved_line(path: &Path, rows: usize) -> String {
    format!("Saved: {} ({} rows)", path.display(), rows)
}

/// A fixed-width text table of the first [`PREVIEW_ROWS`] rows, or
/// `(no rows)`.
pub fn preview(result: &ResultSet) -> String {
    if result.is_empty() {
        return "(no rows)".to_string();
    }

    let shown: Vec<Vec<String>> = result
        .rows()
        .iter()
        .take(PREVIEW_ROWS)
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect();

    let widths: Vec<usize> = result
        .columns()
        .iter()
        .enumerate()
        .map(|(i, header)| {
            shown
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let render = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .join("  ")
            .trim_end()
            .to_string()
    };

    std::iter::once(render(result.columns()))
        .chain(shown.iter().map(|row| render(row.as_slice())))
        .join("\n")
}
