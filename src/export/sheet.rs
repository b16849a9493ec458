//! Per-sheet layout and formatting rules.
//!
//! Formatting is decided by [`plan_sheet`] from the data alone, then applied
//! by [`write_sheet`]. Nothing about the rules is stored between runs.

use crate::config::{ColorScale, NumericDetection};
use crate::error::ExportError;
use rust_xlsxwriter::{
    Color as XlsxColor, ConditionalFormat3ColorScale, ConditionalFormatType, Format, Worksheet,
};
use tally_types::{ResultSet, Value};

/// Color scales need at least this many data rows.
const MIN_SCALED_ROWS: usize = 2;

const DATE_FORMAT: &str = "yyyy-mm-dd";
const TIMESTAMP_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Cell range `(first_row, first_col, last_row, last_col)`, zero based.
pub type CellRange = (u32, u16, u32, u16);

/// What one sheet gets, besides its cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetPlan {
    pub name: String,
    /// Top-left cell below and right of the frozen panes.
    pub freeze: (u32, u16),
    /// Header plus data. `None` for a sheet without columns.
    pub autofilter: Option<CellRange>,
    /// Columns that receive the three-stop color scale over their data rows.
    pub color_scale_columns: Vec<u16>,
    pub data_rows: u32,
}

impl SheetPlan {
    /// Data range of one scaled column.
    pub fn color_scale_range(&self, column: u16) -> CellRange {
        (1, column, self.data_rows, column)
    }
}

/// Decides the layout and formatting of one sheet.
///
/// A column is scaled when the sheet has at least two data rows and, under
/// [`NumericDetection::FirstRow`], the first data row's cell is a number.
/// Booleans are not numbers. Later cells are never consulted in that mode,
/// so a column that starts with text stays unformatted.
pub fn plan_sheet(name: &str, result: &ResultSet, detection: NumericDetection) -> SheetPlan {
    let data_rows = result.len() as u32;
    let columns = result.column_count();

    let autofilter = columns
        .checked_sub(1)
        .map(|last_col| (0, 0, data_rows, last_col as u16));

    let color_scale_columns = if result.len() >= MIN_SCALED_ROWS {
        (0..columns)
            .filter(|&index| is_numeric_column(result, index, detection))
            .map(|index| index as u16)
            .collect()
    } else {
        Vec::new()
    };

    SheetPlan {
        name: name.to_string(),
        freeze: (1, 1),
        autofilter,
        color_scale_columns,
        data_rows,
    }
}

fn is_numeric_column(result: &ResultSet, index: usize, detection: NumericDetection) -> bool {
    match detection {
        NumericDetection::FirstRow => result
            .rows()
            .first()
            .and_then(|row| row.get(index))
            .is_some_and(Value::is_numeric),
        NumericDetection::FullColumn => {
            let mut present = result.column(index).filter(|v| !v.is_null()).peekable();
            present.peek().is_some() && present.all(Value::is_numeric)
        }
    }
}

/// Writes header, cells and the planned formatting into `sheet`.
pub fn write_sheet(
    sheet: &mut Worksheet,
    plan: &SheetPlan,
    result: &ResultSet,
    scale: &ColorScale,
) -> Result<(), ExportError> {
    sheet.set_name(plan.name.as_str())?;

    for (col, header) in result.columns().iter().enumerate() {
        sheet.write_string(0, col as u16, header.as_str())?;
    }

    let date = Format::new().set_num_format(DATE_FORMAT);
    let timestamp = Format::new().set_num_format(TIMESTAMP_FORMAT);
    for (index, row) in result.rows().iter().enumerate() {
        let row_num = index as u32 + 1;
        for (col, value) in row.iter().enumerate() {
            let col = col as u16;
            match value {
                Value::Null => {}
                Value::Bool(b) => {
                    sheet.write_boolean(row_num, col, *b)?;
                }
                Value::Int(_) | Value::Decimal(_) | Value::Float(_) => {
                    if let Some(number) = value.as_f64().filter(|n| n.is_finite()) {
                        sheet.write_number(row_num, col, number)?;
                    }
                }
                Value::Text(text) => {
                    sheet.write_string(row_num, col, text.as_str())?;
                }
                Value::Date(d) => {
                    sheet.write_date_with_format(row_num, col, d, &date)?;
                }
                Value::Timestamp(ts) => {
                    sheet.write_datetime_with_format(row_num, col, ts, &timestamp)?;
                }
            }
        }
    }

    let (freeze_row, freeze_col) = plan.freeze;
    sheet.set_freeze_panes(freeze_row, freeze_col)?;

    if let Some((first_row, first_col, last_row, last_col)) = plan.autofilter {
        sheet.autofilter(first_row, first_col, last_row, last_col)?;
    }

    let rule = color_scale_rule(scale);
    for &column in &plan.color_scale_columns {
        let (first_row, first_col, last_row, last_col) = plan.color_scale_range(column);
        sheet.add_conditional_format(first_row, first_col, last_row, last_col, &rule)?;
    }
    Ok(())
}

/// Minimum, 50th percentile and maximum, mapped to the configured colors.
fn color_scale_rule(scale: &ColorScale) -> ConditionalFormat3ColorScale {
    ConditionalFormat3ColorScale::new()
        .set_minimum(ConditionalFormatType::Lowest, 0)
        .set_midpoint(ConditionalFormatType::Percentile, 50)
        .set_maximum(ConditionalFormatType::Highest, 0)
        .set_minimum_color(XlsxColor::RGB(scale.low.to_rgb_u32()))
        .set_midpoint_color(XlsxColor::RGB(scale.mid.to_rgb_u32()))
        .set_maximum_color(XlsxColor::RGB(scale.high.to_rgb_u32()))
}
