//! Report settings.
//!
//! Defaults are layered under environment variables prefixed with
//! `REPORT__`, e.g. `REPORT__CHARTS_DIR=out/charts` or
//! `REPORT__COLOR_SCALE__LOW=#990000`.

use crate::error::PipelineError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tally_types::Color;

/// How the export stage decides that a column is numeric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NumericDetection {
    /// Sample only the first data row. A column whose first cell is text
    /// gets no color scale even if later cells are numbers.
    #[default]
    FirstRow,
    /// Every non-null cell must be numeric, and at least one must exist.
    FullColumn,
}

/// The three stops of the per-column color scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColorScale {
    pub low: Color,
    pub mid: Color,
    pub high: Color,
}

impl Default for ColorScale {
    fn default() -> Self {
        Self {
            low: Color::rgb(0xAA, 0x00, 0x00),
            mid: Color::rgb(0xFF, 0xFF, 0x00),
            high: Color::rgb(0x00, 0xAA, 0x00),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub charts_dir: PathBuf,
    pub exports_dir: PathBuf,
    pub workbook_name: String,
    /// Categories kept before the rest collapse into "Other" on the pie chart.
    pub pie_top_n: usize,
    /// Categories kept on the animated chart.
    pub animated_top_n: usize,
    pub histogram_bins: usize,
    pub numeric_detection: NumericDetection,
    pub color_scale: ColorScale,
    /// Open the interactive chart in the system viewer once written.
    pub open_interactive: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            charts_dir: PathBuf::from("charts"),
            exports_dir: PathBuf::from("exports"),
            workbook_name: "olist_summary.xlsx".to_string(),
            pie_top_n: 10,
            animated_top_n: 8,
            histogram_bins: 20,
            numeric_detection: NumericDetection::FirstRow,
            color_scale: ColorScale::default(),
            open_interactive: true,
        }
    }
}

impl ReportConfig {
    /// Loads the configuration from the process environment.
    pub fn load() -> Result<Self, PipelineError> {
        Self::from_source(None)
    }

    /// Loads the configuration from an explicit variable map instead of the
    /// process environment. Keys keep their `REPORT__` prefix.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, PipelineError> {
        Self::from_source(Some(vars))
    }

    fn from_source(vars: Option<HashMap<String, String>>) -> Result<Self, PipelineError> {
        let env = config::Environment::with_prefix("REPORT")
            .separator("__")
            .try_parsing(true)
            .source(vars);

        let config: ReportConfig = config::Config::builder()
            .add_source(env)
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), PipelineError> {
        if self.pie_top_n == 0 || self.animated_top_n == 0 {
            return Err(PipelineError::Config(
                "top-N limits must be at least 1".to_string(),
            ));
        }
        if self.histogram_bins == 0 {
            return Err(PipelineError::Config(
                "histogram_bins must be at least 1".to_string(),
            ));
        }
        if self.workbook_name.trim().is_empty() {
            return Err(PipelineError::Config("workbook_name is empty".to_string()));
        }
        Ok(())
    }

    pub fn workbook_path(&self) -> PathBuf {
        self.exports_dir.join(&self.workbook_name)
    }
}
