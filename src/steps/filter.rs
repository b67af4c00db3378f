// Row filtering step
// Author: Gabriel Demetrios Lafis

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::{StepChange, StepError};
use crate::cast::try_cast;
use crate::table::{Cell, ColumnType, Table};

/// Comparison operators supported by the filter step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    Contains,
    NotContains,
    IsNull,
    NotNull,
}

impl FilterOperator {
    /// Get the wire name of the operator
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Equals => "equals",
            FilterOperator::NotEquals => "not_equals",
            FilterOperator::GreaterThan => "greater_than",
            FilterOperator::GreaterOrEqual => "greater_or_equal",
            FilterOperator::LessThan => "less_than",
            FilterOperator::LessOrEqual => "less_or_equal",
            FilterOperator::Contains => "contains",
            FilterOperator::NotContains => "not_contains",
            FilterOperator::IsNull => "is_null",
            FilterOperator::NotNull => "not_null",
        }
    }

    fn requires_value(&self) -> bool {
        !matches!(self, FilterOperator::IsNull | FilterOperator::NotNull)
    }
}

/// Configuration for the filter step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    pub column: String,
    pub operator: FilterOperator,
    pub value: Option<Cell>,
}

/// Keep rows for which the configured comparison holds
///
/// Null cells match only `is_null`. Comparisons between mismatched runtime
/// types never match, with one bridge: a string comparison value is parsed
/// as a date when the cell is a date.
pub fn filter(table: &Table, config: &FilterConfig) -> Result<StepChange, StepError> {
    let index = table
        .column_index(&config.column)
        .ok_or_else(|| StepError::ColumnNotFound(config.column.clone()))?;

    if config.operator.requires_value() && config.value.is_none() {
        return Err(StepError::InvalidConfig(format!(
            "operator '{}' requires a value",
            config.operator.as_str()
        )));
    }

    if matches!(
        config.operator,
        FilterOperator::Contains | FilterOperator::NotContains
    ) && !matches!(config.value, Some(Cell::String(_)))
    {
        return Err(StepError::InvalidConfig(format!(
            "operator '{}' requires a string value",
            config.operator.as_str()
        )));
    }

    let mut output = table.clone();
    output.rows = table
        .rows
        .iter()
        .filter(|row| cell_matches(&row.cells[index], config.operator, config.value.as_ref()))
        .cloned()
        .collect();

    let rows_affected = table.rows.len() - output.rows.len();
    output.recompute_all_columns();

    Ok(StepChange {
        table: output,
        rows_affected,
    })
}

fn cell_matches(cell: &Cell, operator: FilterOperator, value: Option<&Cell>) -> bool {
    let value = match operator {
        FilterOperator::IsNull => return cell.is_null(),
        FilterOperator::NotNull => return !cell.is_null(),
        _ if cell.is_null() => return false,
        _ => match value {
            Some(v) => v,
            None => return false,
        },
    };

    match operator {
        FilterOperator::Equals => coerce_value(cell, value).map_or(false, |v| *cell == v),
        FilterOperator::NotEquals => coerce_value(cell, value).map_or(false, |v| *cell != v),
        FilterOperator::GreaterThan => ordering(cell, value) == Some(Ordering::Greater),
        FilterOperator::GreaterOrEqual => matches!(
            ordering(cell, value),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        FilterOperator::LessThan => ordering(cell, value) == Some(Ordering::Less),
        FilterOperator::LessOrEqual => {
            matches!(ordering(cell, value), Some(Ordering::Less | Ordering::Equal))
        }
        FilterOperator::Contains | FilterOperator::NotContains => {
            let needle = match value {
                Cell::String(s) => s,
                _ => return false,
            };
            match cell {
                Cell::String(text) => {
                    let found = text.contains(needle.as_str());
                    if operator == FilterOperator::Contains {
                        found
                    } else {
                        !found
                    }
                }
                _ => false,
            }
        }
        FilterOperator::IsNull | FilterOperator::NotNull => false,
    }
}

// Comparison values arrive from JSON, where dates are plain strings
fn coerce_value(cell: &Cell, value: &Cell) -> Option<Cell> {
    if cell.runtime_type() == value.runtime_type() {
        return Some(value.clone());
    }

    if let (Cell::Date(_), Cell::String(_)) = (cell, value) {
        if let Ok(date) = try_cast(value, ColumnType::Date, None) {
            return Some(date);
        }
    }

    None
}

fn ordering(cell: &Cell, value: &Cell) -> Option<Ordering> {
    let value = coerce_value(cell, value)?;
    match (cell, &value) {
        (Cell::Number(a), Cell::Number(b)) => a.partial_cmp(b),
        (Cell::String(a), Cell::String(b)) => Some(a.cmp(b)),
        (Cell::Date(a), Cell::Date(b)) => Some(a.cmp(b)),
        (Cell::Boolean(a), Cell::Boolean(b)) => Some(a.cmp(b)),
        _ => None,
    }
}
