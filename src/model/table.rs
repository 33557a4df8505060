//! Table types.

use serde::{Deserialize, Serialize};

/// A table row: cells may be absent when the collaborator found an empty slot.
pub type Row = Vec<Option<String>>;

/// A raw table grid as detected on a page.
///
/// Rows are not required to have the same length; renderers pad ragged rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    /// Rows in extraction order; the first row is treated as the header
    pub rows: Vec<Row>,
}

impl Table {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table from rows of optional cells.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Create a table from rows of present string cells.
    pub fn from_strings<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(|c| Some(c.into())).collect())
                .collect(),
        }
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (longest row).
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the header row, if any.
    pub fn header(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// Get body rows (everything after the header).
    pub fn body(&self) -> &[Row] {
        self.rows.get(1..).unwrap_or(&[])
    }
}
