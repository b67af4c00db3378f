// Column type casting step
// Author: Gabriel Demetrios Lafis

use serde::{Deserialize, Serialize};

use super::{StepChange, StepError};
use crate::cast::{try_cast, CastMode};
use crate::table::{Cell, ColumnType, Row, Table};

/// Configuration for the cast column step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastColumnConfig {
    pub column: String,
    pub target_type: ColumnType,
    pub format: Option<String>,
    #[serde(default)]
    pub on_error: CastMode,
}

/// Cast every value in a column to the target type
///
/// Failing values follow the configured mode: `fail` aborts the step on the
/// first failure, `null` replaces the value, `skip` removes the whole row.
/// The column's declared type becomes the target type on success.
pub fn cast_column(table: &Table, config: &CastColumnConfig) -> Result<StepChange, StepError> {
    let index = table
        .column_index(&config.column)
        .ok_or_else(|| StepError::ColumnNotFound(config.column.clone()))?;

    let format = config.format.as_deref();

    let mut rows = Vec::with_capacity(table.rows.len());
    let mut changed = 0usize;
    let mut removed = 0usize;

    for (row_index, row) in table.rows.iter().enumerate() {
        match try_cast(&row.cells[index], config.target_type, format) {
            Ok(cast) => {
                let mut cells = row.cells.clone();
                if cast != cells[index] {
                    changed += 1;
                }
                cells[index] = cast;
                rows.push(Row::new(cells));
            }
            Err(err) => match config.on_error {
                CastMode::Fail => {
                    return Err(StepError::CastFailed {
                        column: config.column.clone(),
                        row: row_index,
                        source: err,
                    });
                }
                CastMode::Null => {
                    let mut cells = row.cells.clone();
                    if !cells[index].is_null() {
                        changed += 1;
                    }
                    cells[index] = Cell::Null;
                    rows.push(Row::new(cells));
                }
                CastMode::Skip => {
                    removed += 1;
                }
            },
        }
    }

    let mut output = table.clone();
    output.rows = rows;
    output.columns[index].column_type = config.target_type;

    if removed > 0 {
        output.recompute_all_columns();
    } else {
        output.recompute_column(index);
    }

    Ok(StepChange {
        table: output,
        rows_affected: changed + removed,
    })
}
