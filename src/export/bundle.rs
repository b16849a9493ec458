//! The named result sets collected over one run.

use log::warn;
use tally_types::ResultSet;

/// Longest sheet name the workbook format accepts, in characters.
pub const MAX_SHEET_NAME: usize = 31;

/// Sheet name for a query name: truncated to [`MAX_SHEET_NAME`] characters.
pub fn sheet_name(name: &str) -> String {
    name.chars().take(MAX_SHEET_NAME).collect()
}

/// Insertion-ordered mapping from sheet name to result set.
///
/// Names are truncated on insert. When two names truncate to the same
/// sheet name (compared case-insensitively, as spreadsheet applications do),
/// the first entry wins and the later one is dropped with a warning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportBundle {
    entries: Vec<(String, ResultSet)>,
}

impl ReportBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `result` under `name`. Returns `false` when the truncated name is
    /// already taken and the entry was dropped.
    pub fn insert(&mut self, name: &str, result: ResultSet) -> bool {
        let sheet = sheet_name(name);
        let lowered = sheet.to_lowercase();
        if self
            .entries
            .iter()
            .any(|(existing, _)| existing.to_lowercase() == lowered)
        {
            warn!(
                "Sheet name '{}' (from '{}') is already taken; keeping the first result set",
                sheet, name
            );
            return false;
        }
        self.entries.push((sheet, result));
        true
    }

    pub fn get(&self, sheet: &str) -> Option<&ResultSet> {
        self.entries
            .iter()
            .find(|(name, _)| name == sheet)
            .map(|(_, result)| result)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResultSet)> {
        self.entries
            .iter()
            .map(|(name, result)| (name.as_str(), result))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Data rows across every sheet, headers excluded.
    pub fn total_rows(&self) -> usize {
        self.entries.iter().map(|(_, result)| result.len()).sum()
    }
}
