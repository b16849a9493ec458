//! Plain CSV snapshots of a single result set.

use crate::error::ExportError;
use std::fs;
use std::path::Path;
use tally_types::ResultSet;

/// Writes `result` to `path` with a header row, creating parent directories
/// as needed. Cells use their display form and nulls become empty fields.
/// Returns the number of data rows written.
pub fn write_csv(result: &ResultSet, path: &Path) -> Result<usize, ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(result.columns())?;
    for row in result.rows() {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    writer.flush()?;
    Ok(result.len())
}
