use crate::error::ShapeError;
use crate::value::Value;

/// An ordered, named, tabular query result.
///
/// Rows keep the order the data source produced them in, and every row has
/// exactly one cell per header column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl ResultSet {
    /// Creates an empty result set with the given header.
    pub fn new<I, S>(columns: I) -> Result<Self, ShapeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        for (i, name) in columns.iter().enumerate() {
            if columns[..i].contains(name) {
                return Err(ShapeError::DuplicateColumn(name.clone()));
            }
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Creates a result set and fills it, validating every row's width.
    pub fn from_rows<I, S>(columns: I, rows: Vec<Vec<Value>>) -> Result<Self, ShapeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new(columns)?;
        set.rows.reserve(rows.len());
        for row in rows {
            set.push_row(row)?;
        }
        Ok(set)
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> Result<(), ShapeError> {
        if row.len() != self.columns.len() {
            return Err(ShapeError::RowWidth {
                row: self.rows.len(),
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns a name-addressable view of one row.
    pub fn row(&self, index: usize) -> Option<RowRef<'_>> {
        self.rows.get(index).map(|cells| RowRef {
            columns: &self.columns,
            cells,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = RowRef<'_>> {
        self.rows.iter().map(|cells| RowRef {
            columns: &self.columns,
            cells,
        })
    }

    /// Iterates over one column's cells, top to bottom.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().filter_map(move |row| row.get(index))
    }
}

/// A borrowed row that resolves cells by column name.
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    columns: &'a [String],
    cells: &'a [Value],
}

impl<'a> RowRef<'a> {
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.cells.get(i))
    }

    pub fn cells(&self) -> &'a [Value] {
        self.cells
    }
}
