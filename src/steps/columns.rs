// Column rename and removal steps
// Author: Gabriel Demetrios Lafis

use serde::{Deserialize, Serialize};

use super::{StepChange, StepError};
use crate::table::{Row, Table};

/// Configuration for the rename column step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameColumnConfig {
    pub old_name: String,
    pub new_name: String,
}

/// Configuration for the remove column step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoveColumnConfig {
    pub columns: Vec<String>,
}

/// Rename a column in place, preserving its position
pub fn rename_column(table: &Table, config: &RenameColumnConfig) -> Result<StepChange, StepError> {
    let index = table
        .column_index(&config.old_name)
        .ok_or_else(|| StepError::ColumnNotFound(config.old_name.clone()))?;

    // Renaming a column to its current name is a successful no-op
    if config.old_name == config.new_name {
        return Ok(StepChange {
            table: table.clone(),
            rows_affected: 0,
        });
    }

    if table.column_index(&config.new_name).is_some() {
        return Err(StepError::ColumnAlreadyExists(config.new_name.clone()));
    }

    let mut output = table.clone();
    output.columns[index].name = config.new_name.clone();

    Ok(StepChange {
        table: output,
        rows_affected: 0,
    })
}

/// Drop the named columns and their data
pub fn remove_column(table: &Table, config: &RemoveColumnConfig) -> Result<StepChange, StepError> {
    if config.columns.is_empty() {
        return Err(StepError::InvalidConfig(
            "no columns to remove".to_string(),
        ));
    }

    let indices = table
        .column_indices(&config.columns)
        .map_err(StepError::ColumnsNotFound)?;

    let mut keep = vec![true; table.columns.len()];
    for &i in &indices {
        keep[i] = false;
    }

    let mut columns = Vec::new();
    let mut kept_indices = Vec::new();
    for (i, column) in table.columns.iter().enumerate() {
        if keep[i] {
            columns.push(column.clone());
            kept_indices.push(i);
        }
    }

    let rows = table
        .rows
        .iter()
        .map(|row| Row::new(kept_indices.iter().map(|&i| row.cells[i].clone()).collect()))
        .collect();

    let mut output = table.clone();
    output.columns = columns;
    output.rows = rows;

    Ok(StepChange {
        table: output,
        rows_affected: table.row_count(),
    })
}
