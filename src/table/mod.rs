// Table model for tabular data transformation
// Author: Gabriel Demetrios Lafis

mod metadata;
mod wire;

pub use metadata::*;
pub use wire::*;

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Represents a single value inside a row
///
/// On the wire a cell is a plain JSON value; `Date` is an internal refinement
/// produced by casting and serializes as an ISO `YYYY-MM-DD` string. The
/// `String` variant is listed before `Date` so that untagged deserialization
/// never reinterprets incoming strings as dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Date(NaiveDate),
}

impl Cell {
    /// Check whether the cell is null
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Get the runtime type of the cell
    pub fn runtime_type(&self) -> ColumnType {
        match self {
            Cell::Null => ColumnType::Null,
            Cell::Boolean(_) => ColumnType::Boolean,
            Cell::Number(_) => ColumnType::Number,
            Cell::String(_) => ColumnType::String,
            Cell::Date(_) => ColumnType::Date,
        }
    }

    /// Render the cell as a display string; null renders as the empty string
    pub fn to_display(&self) -> String {
        match self {
            Cell::Null => String::new(),
            Cell::Boolean(b) => b.to_string(),
            Cell::Number(n) => n.to_string(),
            Cell::String(s) => s.clone(),
            Cell::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }

    /// Append an unambiguous key fragment for grouping and deduplication
    ///
    /// Fragments are type-tagged and strings are length-prefixed, so no two
    /// distinct cell sequences can encode to the same key. Nulls encode by
    /// identity: two nulls in the same position always match.
    pub(crate) fn push_key_fragment(&self, key: &mut String) {
        match self {
            Cell::Null => key.push_str("z;"),
            Cell::Boolean(b) => {
                key.push_str(if *b { "b1;" } else { "b0;" });
            }
            Cell::Number(n) => {
                key.push_str(&format!("n{:016x};", n.to_bits()));
            }
            Cell::String(s) => {
                key.push_str(&format!("s{}:{};", s.len(), s));
            }
            Cell::Date(d) => {
                key.push_str(&format!("d{};", d.format("%Y-%m-%d")));
            }
        }
    }
}

/// Represents the declared type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Number,
    Boolean,
    Date,
    Null,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::String => "string",
            ColumnType::Number => "number",
            ColumnType::Boolean => "boolean",
            ColumnType::Date => "date",
            ColumnType::Null => "null",
        };
        write!(f, "{}", name)
    }
}

/// Metadata describing a single column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMeta {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(default)]
    pub non_null_count: usize,
    #[serde(default)]
    pub null_count: usize,
    #[serde(default)]
    pub sample_values: Vec<Cell>,
}

impl ColumnMeta {
    /// Create column metadata with zeroed statistics
    pub fn new(name: &str, column_type: ColumnType) -> Self {
        ColumnMeta {
            name: name.to_string(),
            column_type,
            non_null_count: 0,
            null_count: 0,
            sample_values: Vec::new(),
        }
    }
}

/// Represents a row of cells aligned with the table's column order
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    /// Create a new row with the given cells
    pub fn new(cells: Vec<Cell>) -> Self {
        Row { cells }
    }

    /// Get a reference to a cell by column index
    pub fn get(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    /// Build the grouping key over the given column indices
    pub(crate) fn key(&self, indices: &[usize]) -> String {
        let mut key = String::new();
        for &i in indices {
            self.cells[i].push_key_fragment(&mut key);
        }
        key
    }
}

/// The tabular value every operation consumes and produces
///
/// Operations never mutate an input table; they return a new value. Warnings
/// accumulate across steps (for example when a step is skipped because its
/// column list is empty) and travel with the table.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub columns: Vec<ColumnMeta>,
    pub rows: Vec<Row>,
    pub warnings: Vec<String>,
}

impl Table {
    /// Create a new empty table with the given columns
    pub fn new(columns: Vec<ColumnMeta>) -> Result<Self, TableError> {
        let mut seen = std::collections::HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(TableError::DuplicateColumn(column.name.clone()));
            }
        }

        Ok(Table {
            columns,
            rows: Vec::new(),
            warnings: Vec::new(),
        })
    }

    /// Create a table from columns and rows, recomputing column statistics
    pub fn from_rows(columns: Vec<ColumnMeta>, rows: Vec<Row>) -> Result<Self, TableError> {
        let mut table = Table::new(columns)?;
        for row in rows {
            table.add_row(row)?;
        }
        table.recompute_all_columns();
        Ok(table)
    }

    /// Add a row to the table
    pub fn add_row(&mut self, row: Row) -> Result<(), TableError> {
        if row.cells.len() != self.columns.len() {
            return Err(TableError::ArityMismatch {
                expected: self.columns.len(),
                got: row.cells.len(),
            });
        }

        self.rows.push(row);
        Ok(())
    }

    /// Get the number of rows in the table
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Find the index of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Resolve a list of column names to indices, collecting missing names
    pub fn column_indices(&self, names: &[String]) -> Result<Vec<usize>, Vec<String>> {
        let mut indices = Vec::with_capacity(names.len());
        let mut missing = Vec::new();

        for name in names {
            match self.column_index(name) {
                Some(i) => indices.push(i),
                None => missing.push(name.clone()),
            }
        }

        if missing.is_empty() {
            Ok(indices)
        } else {
            Err(missing)
        }
    }

    /// Get a reference to a cell by row and column index
    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(column))
    }
}

/// Represents an error in the table model
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("Duplicate column name '{0}'")]
    DuplicateColumn(String),
    #[error("Row has {got} cells, table has {expected} columns")]
    ArityMismatch { expected: usize, got: usize },
}
