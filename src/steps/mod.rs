// Step operations library: one pure function per step type
// Author: Gabriel Demetrios Lafis

mod cast_column;
mod columns;
mod dedupe;
mod fill;
mod filter;
mod reshape;
mod sort;
mod split_merge;
mod text;

pub use cast_column::*;
pub use columns::*;
pub use dedupe::*;
pub use fill::*;
pub use filter::*;
pub use reshape::*;
pub use sort::*;
pub use split_merge::*;
pub use text::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cast::CastError;
use crate::table::Table;

/// Result of a successfully applied step
#[derive(Debug, Clone, PartialEq)]
pub struct StepChange {
    pub table: Table,
    pub rows_affected: usize,
}

/// Represents a step-level failure
///
/// Configuration errors are detected before any row is produced; the input
/// table is always returned unchanged alongside a failed step.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StepError {
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),
    #[error("Columns not found: {}", .0.join(", "))]
    ColumnsNotFound(Vec<String>),
    #[error("Column '{0}' already exists")]
    ColumnAlreadyExists(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Cast failed for column '{column}' at row {row}: {source}")]
    CastFailed {
        column: String,
        row: usize,
        source: CastError,
    },
}

/// Closed union of step configurations, one variant per step type
///
/// The wire form is `{ "type": <tag>, "config": { ... } }` with snake_case
/// tags and camelCase config fields. Adding a variant is a compile-checked
/// change everywhere steps are consumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "config", rename_all = "snake_case")]
pub enum StepConfig {
    Trim(TextConfig),
    Uppercase(TextConfig),
    Lowercase(TextConfig),
    Deduplicate(DeduplicateConfig),
    Filter(FilterConfig),
    RenameColumn(RenameColumnConfig),
    RemoveColumn(RemoveColumnConfig),
    CastColumn(CastColumnConfig),
    Unpivot(UnpivotConfig),
    Pivot(PivotConfig),
    FillDown(FillConfig),
    FillAcross(FillConfig),
    SplitColumn(SplitColumnConfig),
    MergeColumns(MergeColumnsConfig),
    Sort(SortConfig),
}

impl StepConfig {
    /// Get the wire tag of this step type
    pub fn kind(&self) -> &'static str {
        match self {
            StepConfig::Trim(_) => "trim",
            StepConfig::Uppercase(_) => "uppercase",
            StepConfig::Lowercase(_) => "lowercase",
            StepConfig::Deduplicate(_) => "deduplicate",
            StepConfig::Filter(_) => "filter",
            StepConfig::RenameColumn(_) => "rename_column",
            StepConfig::RemoveColumn(_) => "remove_column",
            StepConfig::CastColumn(_) => "cast_column",
            StepConfig::Unpivot(_) => "unpivot",
            StepConfig::Pivot(_) => "pivot",
            StepConfig::FillDown(_) => "fill_down",
            StepConfig::FillAcross(_) => "fill_across",
            StepConfig::SplitColumn(_) => "split_column",
            StepConfig::MergeColumns(_) => "merge_columns",
            StepConfig::Sort(_) => "sort",
        }
    }
}

/// One declarative transformation step with its pipeline-unique id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformStep {
    pub id: String,
    #[serde(flatten)]
    pub config: StepConfig,
}

/// Apply a single step configuration to a table
pub fn apply_step(table: &Table, config: &StepConfig) -> Result<StepChange, StepError> {
    match config {
        StepConfig::Trim(c) => trim(table, c),
        StepConfig::Uppercase(c) => uppercase(table, c),
        StepConfig::Lowercase(c) => lowercase(table, c),
        StepConfig::Deduplicate(c) => deduplicate(table, c),
        StepConfig::Filter(c) => filter(table, c),
        StepConfig::RenameColumn(c) => rename_column(table, c),
        StepConfig::RemoveColumn(c) => remove_column(table, c),
        StepConfig::CastColumn(c) => cast_column(table, c),
        StepConfig::Unpivot(c) => unpivot(table, c),
        StepConfig::Pivot(c) => pivot(table, c),
        StepConfig::FillDown(c) => fill_down(table, c),
        StepConfig::FillAcross(c) => fill_across(table, c),
        StepConfig::SplitColumn(c) => split_column(table, c),
        StepConfig::MergeColumns(c) => merge_columns(table, c),
        StepConfig::Sort(c) => sort(table, c),
    }
}
