// Row deduplication step
// Author: Gabriel Demetrios Lafis

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{StepChange, StepError};
use crate::table::Table;

/// Configuration for the deduplicate step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeduplicateConfig {
    pub columns: Option<Vec<String>>,
}

/// Remove duplicate rows, keeping the first occurrence per key
///
/// The key covers every column when no subset is configured. Kept rows
/// preserve their original relative order, so the operation is idempotent.
pub fn deduplicate(table: &Table, config: &DeduplicateConfig) -> Result<StepChange, StepError> {
    let indices = match &config.columns {
        Some(names) if !names.is_empty() => table
            .column_indices(names)
            .map_err(StepError::ColumnsNotFound)?,
        _ => (0..table.columns.len()).collect(),
    };

    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(table.rows.len());

    for row in &table.rows {
        let key = row.key(&indices);
        if seen.insert(key) {
            kept.push(row.clone());
        }
    }

    let rows_affected = table.rows.len() - kept.len();

    let mut output = table.clone();
    output.rows = kept;
    output.recompute_all_columns();

    Ok(StepChange {
        table: output,
        rows_affected,
    })
}
