// Pipeline executor: ordered step application with per-step outcomes
// Author: Gabriel Demetrios Lafis

use log::{debug, warn};
use serde::Serialize;
use thiserror::Error;

use crate::steps::{apply_step, TransformStep};
use crate::table::Table;

/// Outcome of one attempted step
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepOutcome {
    pub step_id: String,
    pub success: bool,
    pub rows_affected: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of executing a pipeline: the final table plus per-step outcomes
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineRun {
    pub table: Table,
    pub step_results: Vec<StepOutcome>,
}

/// Represents an executor-level error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("Stop index {stop_index} is out of range for {step_count} steps")]
    StopIndexOutOfRange {
        stop_index: usize,
        step_count: usize,
    },
}

/// Apply every step in order to the initial table
///
/// Each step consumes the previous step's output. A failed step records its
/// error and aborts the remaining pipeline, so outcomes cover attempted
/// steps only. The executor itself never fails; given identical inputs it
/// produces identical results.
pub fn execute_pipeline(initial: &Table, steps: &[TransformStep]) -> PipelineRun {
    let mut table = initial.clone();
    let mut step_results = Vec::with_capacity(steps.len());

    for step in steps {
        match apply_step(&table, &step.config) {
            Ok(change) => {
                debug!(
                    "Step '{}' ({}) applied: {} rows affected, {} rows out",
                    step.id,
                    step.config.kind(),
                    change.rows_affected,
                    change.table.row_count()
                );
                step_results.push(StepOutcome {
                    step_id: step.id.clone(),
                    success: true,
                    rows_affected: change.rows_affected,
                    error: None,
                });
                table = change.table;
            }
            Err(err) => {
                warn!(
                    "Step '{}' ({}) failed: {}",
                    step.id,
                    step.config.kind(),
                    err
                );
                step_results.push(StepOutcome {
                    step_id: step.id.clone(),
                    success: false,
                    rows_affected: 0,
                    error: Some(err.to_string()),
                });
                break;
            }
        }
    }

    PipelineRun {
        table,
        step_results,
    }
}

/// Apply steps up to and including `stop_index`, for intermediate previews
pub fn execute_until_step(
    initial: &Table,
    steps: &[TransformStep],
    stop_index: usize,
) -> Result<PipelineRun, PipelineError> {
    if stop_index >= steps.len() {
        return Err(PipelineError::StopIndexOutOfRange {
            stop_index,
            step_count: steps.len(),
        });
    }

    Ok(execute_pipeline(initial, &steps[..=stop_index]))
}
