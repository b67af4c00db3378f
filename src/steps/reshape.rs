// Reshaping steps: unpivot (wide to long) and pivot (long to wide)
// Author: Gabriel Demetrios Lafis

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::{StepChange, StepError};
use crate::table::{Cell, ColumnMeta, ColumnType, Row, Table};

fn default_variable_column() -> String {
    "variable".to_string()
}

fn default_value_column() -> String {
    "value".to_string()
}

/// Configuration for the unpivot step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnpivotConfig {
    pub id_columns: Vec<String>,
    pub value_columns: Vec<String>,
    #[serde(default = "default_variable_column")]
    pub variable_column_name: String,
    #[serde(default = "default_value_column")]
    pub value_column_name: String,
}

/// Configuration for the pivot step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotConfig {
    pub index_columns: Vec<String>,
    pub column_source: String,
    pub value_source: String,
}

/// Melt value columns into variable/value pairs
///
/// Emits one output row per input row and value column, carrying the id
/// cells, the source column's name, and its cell. Output columns are the id
/// columns in config order followed by the variable and value columns.
pub fn unpivot(table: &Table, config: &UnpivotConfig) -> Result<StepChange, StepError> {
    if config.value_columns.is_empty() {
        return Err(StepError::InvalidConfig(
            "unpivot requires at least one value column".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for name in &config.id_columns {
        if !seen.insert(name.as_str()) {
            return Err(StepError::InvalidConfig(format!(
                "duplicate id column '{}'",
                name
            )));
        }
    }

    for name in &config.value_columns {
        if config.id_columns.contains(name) {
            return Err(StepError::InvalidConfig(format!(
                "column '{}' is both an id and a value column",
                name
            )));
        }
    }

    let id_indices = table
        .column_indices(&config.id_columns)
        .map_err(StepError::ColumnsNotFound)?;
    let value_indices = table
        .column_indices(&config.value_columns)
        .map_err(StepError::ColumnsNotFound)?;

    if config.variable_column_name == config.value_column_name {
        return Err(StepError::InvalidConfig(
            "variable and value column names must differ".to_string(),
        ));
    }
    for name in [&config.variable_column_name, &config.value_column_name] {
        if config.id_columns.contains(name) {
            return Err(StepError::ColumnAlreadyExists(name.clone()));
        }
    }

    let mut columns: Vec<ColumnMeta> = id_indices
        .iter()
        .map(|&i| table.columns[i].clone())
        .collect();
    columns.push(ColumnMeta::new(
        &config.variable_column_name,
        ColumnType::String,
    ));
    columns.push(ColumnMeta::new(&config.value_column_name, ColumnType::Null));

    let mut rows = Vec::with_capacity(table.rows.len() * value_indices.len());
    for row in &table.rows {
        for &v in &value_indices {
            let mut cells: Vec<Cell> = id_indices.iter().map(|&i| row.cells[i].clone()).collect();
            cells.push(Cell::String(table.columns[v].name.clone()));
            cells.push(row.cells[v].clone());
            rows.push(Row::new(cells));
        }
    }

    let mut output = Table {
        columns,
        rows,
        warnings: table.warnings.clone(),
    };

    // The melted value column's type comes from its cells
    let value_index = output.columns.len() - 1;
    output.reinfer_column_type(value_index);
    output.recompute_all_columns();

    Ok(StepChange {
        table: output,
        rows_affected: table.row_count(),
    })
}

/// Spread a long table into one column per distinct source value
///
/// Rows group by the index columns in first-occurrence order; generated
/// columns follow the first occurrence of each distinct stringified source
/// value. When several rows land in the same output cell the last one wins.
/// Cells with no source row are null.
pub fn pivot(table: &Table, config: &PivotConfig) -> Result<StepChange, StepError> {
    if config.index_columns.is_empty() {
        return Err(StepError::InvalidConfig(
            "pivot requires at least one index column".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for name in &config.index_columns {
        if !seen.insert(name.as_str()) {
            return Err(StepError::InvalidConfig(format!(
                "duplicate index column '{}'",
                name
            )));
        }
    }

    if config.index_columns.contains(&config.column_source) {
        return Err(StepError::InvalidConfig(format!(
            "column '{}' cannot be both an index and the column source",
            config.column_source
        )));
    }
    if config.index_columns.contains(&config.value_source) {
        return Err(StepError::InvalidConfig(format!(
            "column '{}' cannot be both an index and the value source",
            config.value_source
        )));
    }
    if config.column_source == config.value_source {
        return Err(StepError::InvalidConfig(
            "column source and value source must differ".to_string(),
        ));
    }

    let index_indices = table
        .column_indices(&config.index_columns)
        .map_err(StepError::ColumnsNotFound)?;
    let column_index = table
        .column_index(&config.column_source)
        .ok_or_else(|| StepError::ColumnNotFound(config.column_source.clone()))?;
    let value_index = table
        .column_index(&config.value_source)
        .ok_or_else(|| StepError::ColumnNotFound(config.value_source.clone()))?;

    let mut group_cells: Vec<Vec<Cell>> = Vec::new();
    let mut group_lookup: HashMap<String, usize> = HashMap::new();
    let mut headers: Vec<String> = Vec::new();
    let mut header_lookup: HashMap<String, usize> = HashMap::new();
    let mut values: HashMap<(usize, usize), Cell> = HashMap::new();

    for row in &table.rows {
        let group_key = row.key(&index_indices);
        let group = match group_lookup.get(&group_key) {
            Some(&g) => g,
            None => {
                let g = group_cells.len();
                group_lookup.insert(group_key, g);
                group_cells.push(index_indices.iter().map(|&i| row.cells[i].clone()).collect());
                g
            }
        };

        let header = row.cells[column_index].to_display();
        let column = match header_lookup.get(&header) {
            Some(&h) => h,
            None => {
                if config.index_columns.contains(&header) {
                    return Err(StepError::ColumnAlreadyExists(header));
                }
                let h = headers.len();
                header_lookup.insert(header.clone(), h);
                headers.push(header);
                h
            }
        };

        // Last write wins when several rows map to the same cell
        values.insert((group, column), row.cells[value_index].clone());
    }

    let mut columns: Vec<ColumnMeta> = index_indices
        .iter()
        .map(|&i| table.columns[i].clone())
        .collect();
    for header in &headers {
        columns.push(ColumnMeta::new(header, ColumnType::Null));
    }

    let mut rows = Vec::with_capacity(group_cells.len());
    for (g, index_cells) in group_cells.iter().enumerate() {
        let mut cells = index_cells.clone();
        for h in 0..headers.len() {
            cells.push(values.get(&(g, h)).cloned().unwrap_or(Cell::Null));
        }
        rows.push(Row::new(cells));
    }

    let mut output = Table {
        columns,
        rows,
        warnings: table.warnings.clone(),
    };

    for i in index_indices.len()..output.columns.len() {
        output.reinfer_column_type(i);
    }
    output.recompute_all_columns();

    Ok(StepChange {
        table: output,
        rows_affected: table.row_count(),
    })
}
