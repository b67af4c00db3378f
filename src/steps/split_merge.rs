// Column splitting and merging steps
// Author: Gabriel Demetrios Lafis

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{StepChange, StepError};
use crate::table::{Cell, ColumnMeta, ColumnType, Table};

/// Splitting method for the split column step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum SplitMethod {
    Delimiter { delimiter: String },
    Regex { pattern: String },
    FixedWidth { widths: Vec<usize> },
}

/// Configuration for the split column step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitColumnConfig {
    pub column: String,
    #[serde(flatten)]
    pub method: SplitMethod,
    pub new_columns: Vec<String>,
}

/// Configuration for the merge columns step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeColumnsConfig {
    pub columns: Vec<String>,
    pub separator: String,
    pub new_column: String,
}

/// Split a column's string rendering into new columns appended at the end
///
/// Fewer parts than declared columns pad with null; extra parts are
/// discarded. A null source yields all-null parts.
pub fn split_column(table: &Table, config: &SplitColumnConfig) -> Result<StepChange, StepError> {
    if config.new_columns.is_empty() {
        return Err(StepError::InvalidConfig(
            "split requires at least one new column".to_string(),
        ));
    }

    let source = table
        .column_index(&config.column)
        .ok_or_else(|| StepError::ColumnNotFound(config.column.clone()))?;

    let mut seen = HashSet::new();
    for name in &config.new_columns {
        if table.column_index(name).is_some() || !seen.insert(name.as_str()) {
            return Err(StepError::ColumnAlreadyExists(name.clone()));
        }
    }

    let splitter = Splitter::new(&config.method, config.new_columns.len())?;

    let mut output = table.clone();
    for name in &config.new_columns {
        output.columns.push(ColumnMeta::new(name, ColumnType::String));
    }

    for row in &mut output.rows {
        let parts = match &row.cells[source] {
            Cell::Null => vec![Cell::Null; config.new_columns.len()],
            cell => splitter.split(&cell.to_display(), config.new_columns.len()),
        };
        row.cells.extend(parts);
    }

    for i in (output.columns.len() - config.new_columns.len())..output.columns.len() {
        output.recompute_column(i);
    }

    Ok(StepChange {
        table: output,
        rows_affected: table.row_count(),
    })
}

/// Concatenate the display strings of the listed columns into a new column
///
/// Null cells contribute the empty string. The merged column is appended
/// after the existing columns.
pub fn merge_columns(table: &Table, config: &MergeColumnsConfig) -> Result<StepChange, StepError> {
    if config.columns.is_empty() {
        return Err(StepError::InvalidConfig(
            "merge requires at least one column".to_string(),
        ));
    }

    let indices = table
        .column_indices(&config.columns)
        .map_err(StepError::ColumnsNotFound)?;

    if table.column_index(&config.new_column).is_some() {
        return Err(StepError::ColumnAlreadyExists(config.new_column.clone()));
    }

    let mut output = table.clone();
    output
        .columns
        .push(ColumnMeta::new(&config.new_column, ColumnType::String));

    for row in &mut output.rows {
        let merged = indices
            .iter()
            .map(|&i| row.cells[i].to_display())
            .collect::<Vec<_>>()
            .join(&config.separator);
        row.cells.push(Cell::String(merged));
    }

    let last = output.columns.len() - 1;
    output.recompute_column(last);

    Ok(StepChange {
        table: output,
        rows_affected: table.row_count(),
    })
}

enum Splitter {
    Delimiter(String),
    Pattern(Regex),
    FixedWidth(Vec<usize>),
}

impl Splitter {
    fn new(method: &SplitMethod, expected: usize) -> Result<Self, StepError> {
        match method {
            SplitMethod::Delimiter { delimiter } => {
                if delimiter.is_empty() {
                    return Err(StepError::InvalidConfig(
                        "split delimiter must not be empty".to_string(),
                    ));
                }
                Ok(Splitter::Delimiter(delimiter.clone()))
            }
            SplitMethod::Regex { pattern } => {
                // Compiled once per step, not per row
                let regex = Regex::new(pattern).map_err(|err| {
                    StepError::InvalidConfig(format!("invalid split pattern: {}", err))
                })?;
                Ok(Splitter::Pattern(regex))
            }
            SplitMethod::FixedWidth { widths } => {
                if widths.len() != expected {
                    return Err(StepError::InvalidConfig(format!(
                        "fixed width count {} does not match {} new columns",
                        widths.len(),
                        expected
                    )));
                }
                Ok(Splitter::FixedWidth(widths.clone()))
            }
        }
    }

    fn split(&self, text: &str, expected: usize) -> Vec<Cell> {
        let mut parts: Vec<Cell> = match self {
            Splitter::Delimiter(delimiter) => text
                .split(delimiter.as_str())
                .take(expected)
                .map(|part| Cell::String(part.to_string()))
                .collect(),
            Splitter::Pattern(regex) => regex
                .split(text)
                .take(expected)
                .map(|part| Cell::String(part.to_string()))
                .collect(),
            Splitter::FixedWidth(widths) => {
                // Widths count characters, not bytes
                let chars: Vec<char> = text.chars().collect();
                let mut parts = Vec::with_capacity(widths.len());
                let mut start = 0usize;
                for &width in widths {
                    if start < chars.len() {
                        let end = (start + width).min(chars.len());
                        parts.push(Cell::String(chars[start..end].iter().collect()));
                        start = end;
                    } else {
                        parts.push(Cell::Null);
                    }
                }
                parts
            }
        };

        while parts.len() < expected {
            parts.push(Cell::Null);
        }
        parts
    }
}
