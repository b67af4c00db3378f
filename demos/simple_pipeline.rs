// Simple pipeline example
// Author: Gabriel Demetrios Lafis

use log::LevelFilter;
use rust_table_transform_engine::{
    pipeline::execute_pipeline,
    steps::{
        CastColumnConfig, DeduplicateConfig, FilterConfig, FilterOperator, SortConfig,
        SortDirection, SortKey, StepConfig, TextConfig, TransformStep,
    },
    table::{run_to_json, Cell, ColumnMeta, ColumnType, Row, Table},
    utils, CastMode,
};

// Raw export with padded names, a bad age, an empty city and a duplicate row
const RAW_CSV: &str = "\
name,age,city
  Alice  ,30,Lisbon
Bob,25,Porto
  Alice  ,30,Lisbon
carol,n/a,
Dave,41,Faro
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    utils::init_logging(LevelFilter::Debug)?;

    // Parse the CSV into a table of raw strings
    let table = parse_csv(RAW_CSV)?;

    println!("Original table:");
    print_table(&table);

    // Describe the cleanup pipeline
    let steps = vec![
        TransformStep {
            id: "trim-text".to_string(),
            config: StepConfig::Trim(TextConfig {
                columns: Some(vec!["name".to_string(), "city".to_string()]),
            }),
        },
        TransformStep {
            id: "age-to-number".to_string(),
            config: StepConfig::CastColumn(CastColumnConfig {
                column: "age".to_string(),
                target_type: ColumnType::Number,
                format: None,
                on_error: CastMode::Null,
            }),
        },
        TransformStep {
            id: "drop-unknown-ages".to_string(),
            config: StepConfig::Filter(FilterConfig {
                column: "age".to_string(),
                operator: FilterOperator::NotNull,
                value: None,
            }),
        },
        TransformStep {
            id: "dedupe".to_string(),
            config: StepConfig::Deduplicate(DeduplicateConfig { columns: None }),
        },
        TransformStep {
            id: "oldest-first".to_string(),
            config: StepConfig::Sort(SortConfig {
                keys: vec![SortKey {
                    name: "age".to_string(),
                    direction: SortDirection::Desc,
                }],
                nulls_position: Default::default(),
            }),
        },
    ];

    // Run the pipeline
    let run = execute_pipeline(&table, &steps);

    // Print per-step outcomes
    println!("\nStep outcomes:");
    for outcome in &run.step_results {
        match &outcome.error {
            Some(error) => println!("  {} -> failed: {}", outcome.step_id, error),
            None => println!(
                "  {} -> ok, {} rows affected",
                outcome.step_id, outcome.rows_affected
            ),
        }
    }

    println!("\nCleaned table:");
    print_table(&run.table);

    // The same result as it would cross the wire
    println!("\nAs JSON:");
    println!("{}", run_to_json(&run)?);

    Ok(())
}

// Helper function to parse CSV text into a table of string cells
fn parse_csv(raw: &str) -> Result<Table, Box<dyn std::error::Error>> {
    let mut reader = csv::ReaderBuilder::new().from_reader(raw.as_bytes());

    let columns: Vec<ColumnMeta> = reader
        .headers()?
        .iter()
        .map(|name| ColumnMeta::new(name, ColumnType::String))
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let cells = record
            .iter()
            .map(|field| {
                if field.is_empty() {
                    Cell::Null
                } else {
                    Cell::String(field.to_string())
                }
            })
            .collect();
        rows.push(Row::new(cells));
    }

    Ok(Table::from_rows(columns, rows)?)
}

// Helper function to print a table
fn print_table(table: &Table) {
    // Print header
    for (i, column) in table.columns.iter().enumerate() {
        if i > 0 {
            print!(" | ");
        }
        print!("{} ({})", column.name, column.column_type);
    }
    println!();

    // Print separator
    for i in 0..table.columns.len() {
        if i > 0 {
            print!("-+-");
        }
        print!("--------");
    }
    println!();

    // Print rows
    for row in &table.rows {
        for (i, cell) in row.cells.iter().enumerate() {
            if i > 0 {
                print!(" | ");
            }
            match cell {
                Cell::Null => print!("NULL"),
                Cell::Boolean(b) => print!("{}", b),
                Cell::Number(n) => print!("{}", n),
                Cell::String(s) => print!("{}", s),
                Cell::Date(d) => print!("{}", d),
            }
        }
        println!();
    }
}
