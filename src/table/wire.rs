// JSON boundary: decode and validate tables and step lists
// Author: Gabriel Demetrios Lafis

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Cell, ColumnMeta, Row, Table, TableError};
use crate::pipeline::{PipelineRun, StepOutcome};
use crate::steps::TransformStep;

/// Represents a boundary decode or encode failure
#[derive(Debug, Error)]
pub enum WireError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Table error: {0}")]
    Table(#[from] TableError),
    #[error("Duplicate step id '{0}'")]
    DuplicateStepId(String),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireTable {
    columns: Vec<ColumnMeta>,
    rows: Vec<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    row_count: usize,
    #[serde(default)]
    warnings: Vec<String>,
}

/// Decode a table from its JSON wire form
///
/// Rows are objects keyed by column name; a missing key decodes to null and
/// undeclared keys are ignored. Column statistics are recomputed rather than
/// trusted, and duplicate column names are rejected.
pub fn table_from_json(json: &str) -> Result<Table, WireError> {
    let wire: WireTable = serde_json::from_str(json)?;

    let columns = wire
        .columns
        .iter()
        .map(|c| ColumnMeta::new(&c.name, c.column_type))
        .collect();

    let mut table = Table::new(columns)?;
    table.warnings = wire.warnings;

    let names: Vec<String> = table.columns.iter().map(|c| c.name.clone()).collect();
    for mut row in wire.rows {
        let mut cells = Vec::with_capacity(names.len());
        for name in &names {
            let cell = match row.remove(name) {
                Some(value) => serde_json::from_value(value)?,
                None => Cell::Null,
            };
            cells.push(cell);
        }
        table.add_row(Row::new(cells))?;
    }

    table.recompute_all_columns();
    Ok(table)
}

/// Encode a table into its JSON wire form
pub fn table_to_json(table: &Table) -> Result<String, WireError> {
    Ok(serde_json::to_string(&wire_table(table)?)?)
}

/// Decode an ordered step list, enforcing step id uniqueness
pub fn steps_from_json(json: &str) -> Result<Vec<TransformStep>, WireError> {
    let steps: Vec<TransformStep> = serde_json::from_str(json)?;

    let mut seen = HashSet::new();
    for step in &steps {
        if !seen.insert(step.id.as_str()) {
            return Err(WireError::DuplicateStepId(step.id.clone()));
        }
    }

    Ok(steps)
}

/// Encode an ordered step list
pub fn steps_to_json(steps: &[TransformStep]) -> Result<String, WireError> {
    Ok(serde_json::to_string(steps)?)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRun<'a> {
    table: WireTable,
    step_results: &'a [StepOutcome],
}

/// Encode a pipeline run for the persistence and serving layer
pub fn run_to_json(run: &PipelineRun) -> Result<String, WireError> {
    let wire = WireRun {
        table: wire_table(&run.table)?,
        step_results: &run.step_results,
    };
    Ok(serde_json::to_string(&wire)?)
}

fn wire_table(table: &Table) -> Result<WireTable, WireError> {
    let mut rows = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let mut object = serde_json::Map::new();
        for (column, cell) in table.columns.iter().zip(&row.cells) {
            object.insert(column.name.clone(), serde_json::to_value(cell)?);
        }
        rows.push(object);
    }

    Ok(WireTable {
        columns: table.columns.clone(),
        rows,
        row_count: table.row_count(),
        warnings: table.warnings.clone(),
    })
}
