// Text transformation steps: trim, uppercase, lowercase
// Author: Gabriel Demetrios Lafis

use serde::{Deserialize, Serialize};

use super::{StepChange, StepError};
use crate::table::{Cell, Table};

/// Configuration shared by the text transformation steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextConfig {
    pub columns: Option<Vec<String>>,
}

enum TextKind {
    Trim,
    Uppercase,
    Lowercase,
}

impl TextKind {
    fn label(&self) -> &'static str {
        match self {
            TextKind::Trim => "trim",
            TextKind::Uppercase => "uppercase",
            TextKind::Lowercase => "lowercase",
        }
    }

    fn apply(&self, text: &str) -> String {
        match self {
            TextKind::Trim => text.trim().to_string(),
            TextKind::Uppercase => text.to_uppercase(),
            TextKind::Lowercase => text.to_lowercase(),
        }
    }
}

/// Trim surrounding whitespace from string cells in the named columns
pub fn trim(table: &Table, config: &TextConfig) -> Result<StepChange, StepError> {
    apply_text(table, config, TextKind::Trim)
}

/// Uppercase string cells in the named columns
pub fn uppercase(table: &Table, config: &TextConfig) -> Result<StepChange, StepError> {
    apply_text(table, config, TextKind::Uppercase)
}

/// Lowercase string cells in the named columns
pub fn lowercase(table: &Table, config: &TextConfig) -> Result<StepChange, StepError> {
    apply_text(table, config, TextKind::Lowercase)
}

fn apply_text(table: &Table, config: &TextConfig, kind: TextKind) -> Result<StepChange, StepError> {
    // A missing or empty column list is a warned no-op, not an error
    let names = match &config.columns {
        Some(names) if !names.is_empty() => names,
        _ => {
            let mut output = table.clone();
            output.warnings.push(format!(
                "Step '{}' skipped: no columns configured",
                kind.label()
            ));
            return Ok(StepChange {
                table: output,
                rows_affected: 0,
            });
        }
    };

    let indices = table
        .column_indices(names)
        .map_err(StepError::ColumnsNotFound)?;

    let mut output = table.clone();
    let mut rows_affected = 0usize;

    for row in &mut output.rows {
        let mut changed = false;
        for &i in &indices {
            if let Cell::String(text) = &row.cells[i] {
                let transformed = kind.apply(text);
                if transformed != *text {
                    row.cells[i] = Cell::String(transformed);
                    changed = true;
                }
            }
        }
        if changed {
            rows_affected += 1;
        }
    }

    for &i in &indices {
        output.recompute_column(i);
    }

    Ok(StepChange {
        table: output,
        rows_affected,
    })
}
