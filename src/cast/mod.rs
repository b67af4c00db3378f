// Type coercion and cast validation
// Author: Gabriel Demetrios Lafis

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::table::{Cell, ColumnType};

/// Date formats tried during auto-detection, in order
pub const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
];

/// Default number of failing samples reported by cast validation
pub const DEFAULT_MAX_SAMPLES: usize = 5;

/// Default number of values inspected by cast validation
pub const DEFAULT_MAX_ROWS: usize = 1000;

/// Represents a value-level cast failure
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Cannot cast '{value}' to {target}: {reason}")]
pub struct CastError {
    pub value: String,
    pub target: ColumnType,
    pub reason: String,
}

impl CastError {
    fn new(value: &Cell, target: ColumnType, reason: &str) -> Self {
        CastError {
            value: value.to_display(),
            target,
            reason: reason.to_string(),
        }
    }
}

/// Policy for values that fail coercion during a cast step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CastMode {
    #[default]
    Fail,
    Null,
    Skip,
}

/// Attempt to coerce a single cell to the target type
///
/// Null input succeeds as null for every target. An optional `format` hint is
/// tried first for date targets but never disables auto-detection.
pub fn try_cast(value: &Cell, target: ColumnType, format: Option<&str>) -> Result<Cell, CastError> {
    if value.is_null() {
        return Ok(Cell::Null);
    }

    match target {
        ColumnType::String => Ok(Cell::String(value.to_display())),
        ColumnType::Number => cast_number(value),
        ColumnType::Boolean => cast_boolean(value),
        ColumnType::Date => cast_date(value, format),
        ColumnType::Null => Err(CastError::new(value, target, "only null casts to null")),
    }
}

fn cast_number(value: &Cell) -> Result<Cell, CastError> {
    match value {
        Cell::Number(n) => Ok(Cell::Number(*n)),
        Cell::String(s) => match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Cell::Number(n)),
            _ => Err(CastError::new(value, ColumnType::Number, "not a valid number")),
        },
        _ => Err(CastError::new(
            value,
            ColumnType::Number,
            "source type is not numeric",
        )),
    }
}

fn cast_boolean(value: &Cell) -> Result<Cell, CastError> {
    match value {
        Cell::Boolean(b) => Ok(Cell::Boolean(*b)),
        Cell::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(Cell::Boolean(true)),
            "false" | "no" | "0" => Ok(Cell::Boolean(false)),
            _ => Err(CastError::new(
                value,
                ColumnType::Boolean,
                "not a recognized boolean literal",
            )),
        },
        _ => Err(CastError::new(
            value,
            ColumnType::Boolean,
            "source type is not boolean",
        )),
    }
}

fn cast_date(value: &Cell, format: Option<&str>) -> Result<Cell, CastError> {
    match value {
        Cell::Date(d) => Ok(Cell::Date(*d)),
        Cell::String(s) => {
            let trimmed = s.trim();

            // Explicit hint first, then the auto-detection list
            if let Some(fmt) = format {
                if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
                    return Ok(Cell::Date(date));
                }
            }

            for fmt in DATE_FORMATS {
                if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
                    return Ok(Cell::Date(date));
                }
            }

            Err(CastError::new(
                value,
                ColumnType::Date,
                "not a recognized date",
            ))
        }
        _ => Err(CastError::new(
            value,
            ColumnType::Date,
            "source type is not a date",
        )),
    }
}

/// Represents one failing value captured during cast validation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidSample {
    pub value: String,
    pub error: String,
}

/// Represents the outcome of validating a column cast over a prefix sample
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CastValidation {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub failure_rate: f64,
    pub invalid_samples: Vec<InvalidSample>,
    pub recommended_mode: CastMode,
}

/// Validate a cast over a prefix sample with default limits
pub fn validate_cast(values: &[Cell], target: ColumnType, format: Option<&str>) -> CastValidation {
    validate_cast_with(values, target, format, DEFAULT_MAX_SAMPLES, DEFAULT_MAX_ROWS)
}

/// Validate a cast over the first `min(max_rows, len)` values
///
/// Side-effect free and safe to call repeatedly; values beyond the prefix
/// are never inspected.
pub fn validate_cast_with(
    values: &[Cell],
    target: ColumnType,
    format: Option<&str>,
    max_samples: usize,
    max_rows: usize,
) -> CastValidation {
    let sample = &values[..values.len().min(max_rows)];

    let mut valid = 0usize;
    let mut invalid = 0usize;
    let mut invalid_samples = Vec::new();

    for cell in sample {
        match try_cast(cell, target, format) {
            Ok(_) => valid += 1,
            Err(err) => {
                invalid += 1;
                if invalid_samples.len() < max_samples {
                    invalid_samples.push(InvalidSample {
                        value: cell.to_display(),
                        error: err.to_string(),
                    });
                }
            }
        }
    }

    let total = sample.len();
    let failure_rate = if total == 0 {
        0.0
    } else {
        invalid as f64 * 100.0 / total as f64
    };

    CastValidation {
        total,
        valid,
        invalid,
        failure_rate,
        invalid_samples,
        recommended_mode: recommend_mode(failure_rate),
    }
}

/// Map a failure rate to the recommended cast mode
pub fn recommend_mode(failure_rate: f64) -> CastMode {
    if failure_rate == 0.0 {
        CastMode::Fail
    } else if failure_rate <= 5.0 {
        CastMode::Skip
    } else if failure_rate <= 20.0 {
        CastMode::Null
    } else {
        CastMode::Fail
    }
}
