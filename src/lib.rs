// Rust Table Transform Engine
// Author: Gabriel Demetrios Lafis

//! # Rust Table Transform Engine
//!
//! A transformation pipeline engine for tabular data written in Rust.
//!
//! ## Features
//!
//! - In-memory table model with column metadata and type inference
//! - Declarative step library: trim/case, deduplicate, filter, rename and
//!   remove columns, type casting, pivot/unpivot, split/merge, fill, sort
//! - Type coercion with column-level validation and recommended cast modes
//! - Pure, deterministic pipeline executor with per-step outcomes
//! - JSON wire boundary for tables, step lists, and execution results
//!
//! ## Example
//!
//! ```rust
//! use rust_table_transform_engine::{
//!     pipeline::execute_pipeline,
//!     steps::{DeduplicateConfig, StepConfig, TextConfig, TransformStep},
//!     table::{Cell, ColumnMeta, ColumnType, Row, Table},
//! };
//!
//! // Build the input table
//! let mut table = Table::new(vec![
//!     ColumnMeta::new("name", ColumnType::String),
//!     ColumnMeta::new("age", ColumnType::Number),
//! ]).unwrap();
//!
//! table.add_row(Row::new(vec![
//!     Cell::String("  Alice ".to_string()),
//!     Cell::Number(30.0),
//! ])).unwrap();
//!
//! table.add_row(Row::new(vec![
//!     Cell::String("Alice".to_string()),
//!     Cell::Number(30.0),
//! ])).unwrap();
//!
//! // Trim names, then drop duplicate rows
//! let steps = vec![
//!     TransformStep {
//!         id: "trim-names".to_string(),
//!         config: StepConfig::Trim(TextConfig {
//!             columns: Some(vec!["name".to_string()]),
//!         }),
//!     },
//!     TransformStep {
//!         id: "dedupe".to_string(),
//!         config: StepConfig::Deduplicate(DeduplicateConfig { columns: None }),
//!     },
//! ];
//!
//! let run = execute_pipeline(&table, &steps);
//!
//! assert_eq!(run.table.row_count(), 1);
//! assert!(run.step_results.iter().all(|outcome| outcome.success));
//! ```

pub mod cast;
pub mod pipeline;
pub mod steps;
pub mod table;
pub mod utils;

// Re-export main types
pub use cast::{try_cast, validate_cast, CastMode, CastValidation};
pub use pipeline::{execute_pipeline, execute_until_step, PipelineRun, StepOutcome};
pub use steps::{apply_step, StepChange, StepConfig, StepError, TransformStep};
pub use table::{Cell, ColumnMeta, ColumnType, Row, Table};
