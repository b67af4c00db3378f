// Fill steps: fill_down and fill_across
// Author: Gabriel Demetrios Lafis

use serde::{Deserialize, Serialize};

use super::{StepChange, StepError};
use crate::table::{Cell, Table};

/// Configuration shared by the fill steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillConfig {
    pub columns: Vec<String>,
    #[serde(default)]
    pub treat_whitespace_as_empty: bool,
}

fn is_empty_cell(cell: &Cell, treat_whitespace_as_empty: bool) -> bool {
    match cell {
        Cell::Null => true,
        Cell::String(s) => s.is_empty() || (treat_whitespace_as_empty && s.trim().is_empty()),
        _ => false,
    }
}

/// Replace empty cells with the nearest preceding non-empty value in row order
pub fn fill_down(table: &Table, config: &FillConfig) -> Result<StepChange, StepError> {
    if config.columns.is_empty() {
        return Err(StepError::InvalidConfig(
            "fill requires at least one column".to_string(),
        ));
    }

    let indices = table
        .column_indices(&config.columns)
        .map_err(StepError::ColumnsNotFound)?;

    let mut output = table.clone();
    let mut filled = vec![false; output.rows.len()];

    for &col in &indices {
        let mut last: Option<Cell> = None;
        for (r, row) in output.rows.iter_mut().enumerate() {
            if is_empty_cell(&row.cells[col], config.treat_whitespace_as_empty) {
                if let Some(value) = &last {
                    row.cells[col] = value.clone();
                    filled[r] = true;
                }
            } else {
                last = Some(row.cells[col].clone());
            }
        }
        output.recompute_column(col);
    }

    let rows_affected = filled.iter().filter(|&&f| f).count();

    Ok(StepChange {
        table: output,
        rows_affected,
    })
}

/// Replace empty cells with the nearest preceding listed column's value
///
/// Columns are walked per row in config order, so an earlier fill feeds
/// later empty cells in the same row.
pub fn fill_across(table: &Table, config: &FillConfig) -> Result<StepChange, StepError> {
    if config.columns.len() < 2 {
        return Err(StepError::InvalidConfig(
            "fill across requires at least two columns".to_string(),
        ));
    }

    let indices = table
        .column_indices(&config.columns)
        .map_err(StepError::ColumnsNotFound)?;

    let mut output = table.clone();
    let mut rows_affected = 0usize;

    for row in &mut output.rows {
        let mut filled = false;
        let mut last: Option<Cell> = None;
        for &col in &indices {
            if is_empty_cell(&row.cells[col], config.treat_whitespace_as_empty) {
                if let Some(value) = &last {
                    row.cells[col] = value.clone();
                    filled = true;
                }
            } else {
                last = Some(row.cells[col].clone());
            }
        }
        if filled {
            rows_affected += 1;
        }
    }

    for &col in &indices {
        output.recompute_column(col);
    }

    Ok(StepChange {
        table: output,
        rows_affected,
    })
}
