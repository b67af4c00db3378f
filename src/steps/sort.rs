// Stable multi-key sort step
// Author: Gabriel Demetrios Lafis

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::{StepChange, StepError};
use crate::table::{Cell, Table};

/// Sort direction for one key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Global placement of null values, applied regardless of direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NullsPosition {
    First,
    #[default]
    Last,
}

/// One sort key: a column name and a direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortKey {
    pub name: String,
    pub direction: SortDirection,
}

/// Configuration for the sort step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortConfig {
    pub keys: Vec<SortKey>,
    #[serde(default)]
    pub nulls_position: NullsPosition,
}

/// Stable multi-key sort over the table's rows
///
/// Keys compare in order until a tie breaks; equal rows keep their input
/// order. Mixed runtime types within a column order by a fixed rank
/// (number, date, string, boolean).
pub fn sort(table: &Table, config: &SortConfig) -> Result<StepChange, StepError> {
    if config.keys.is_empty() {
        return Err(StepError::InvalidConfig(
            "sort requires at least one key".to_string(),
        ));
    }

    let names: Vec<String> = config.keys.iter().map(|k| k.name.clone()).collect();
    let indices = table
        .column_indices(&names)
        .map_err(StepError::ColumnsNotFound)?;

    let mut order: Vec<usize> = (0..table.rows.len()).collect();
    order.sort_by(|&a, &b| {
        for (key, &col) in config.keys.iter().zip(&indices) {
            let ord = compare_for_sort(
                &table.rows[a].cells[col],
                &table.rows[b].cells[col],
                key.direction,
                config.nulls_position,
            );
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });

    let rows_affected = order
        .iter()
        .enumerate()
        .filter(|&(new, &old)| new != old)
        .count();

    let mut output = table.clone();
    output.rows = order.iter().map(|&i| table.rows[i].clone()).collect();
    output.recompute_all_columns();

    Ok(StepChange {
        table: output,
        rows_affected,
    })
}

fn compare_for_sort(a: &Cell, b: &Cell, direction: SortDirection, nulls: NullsPosition) -> Ordering {
    // Null placement is global and ignores the key's direction
    match (a.is_null(), b.is_null()) {
        (true, true) => return Ordering::Equal,
        (true, false) => {
            return match nulls {
                NullsPosition::First => Ordering::Less,
                NullsPosition::Last => Ordering::Greater,
            }
        }
        (false, true) => {
            return match nulls {
                NullsPosition::First => Ordering::Greater,
                NullsPosition::Last => Ordering::Less,
            }
        }
        (false, false) => {}
    }

    let ord = compare_non_null(a, b);
    match direction {
        SortDirection::Asc => ord,
        SortDirection::Desc => ord.reverse(),
    }
}

fn compare_non_null(a: &Cell, b: &Cell) -> Ordering {
    match (a, b) {
        (Cell::Number(x), Cell::Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (Cell::String(x), Cell::String(y)) => x.cmp(y),
        (Cell::Date(x), Cell::Date(y)) => x.cmp(y),
        (Cell::Boolean(x), Cell::Boolean(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(cell: &Cell) -> u8 {
    match cell {
        Cell::Number(_) => 0,
        Cell::Date(_) => 1,
        Cell::String(_) => 2,
        Cell::Boolean(_) => 3,
        Cell::Null => 4,
    }
}
