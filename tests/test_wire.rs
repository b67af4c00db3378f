// Wire boundary tests
// Author: Gabriel Demetrios Lafis

use chrono::NaiveDate;
use rust_table_transform_engine::cast::CastMode;
use rust_table_transform_engine::pipeline::execute_pipeline;
use rust_table_transform_engine::steps::{
    CastColumnConfig, FilterOperator, NullsPosition, PivotConfig, RemoveColumnConfig,
    SortConfig, SortDirection, SortKey, SplitColumnConfig, SplitMethod, StepConfig, TextConfig,
    TransformStep,
};
use rust_table_transform_engine::table::{
    run_to_json, steps_from_json, steps_to_json, table_from_json, table_to_json, Cell,
    ColumnMeta, ColumnType, Row, Table, WireError,
};

#[test]
fn test_table_from_json() {
    let json = r#"{
        "columns": [
            {"name": "name", "type": "string", "nonNullCount": 99, "nullCount": 99},
            {"name": "age", "type": "number"}
        ],
        "rows": [
            {"name": "Alice", "age": 30},
            {"name": "Bob", "age": null, "extra": true},
            {"name": "Carol"}
        ],
        "rowCount": 3
    }"#;

    let table = table_from_json(json).unwrap();

    assert_eq!(table.row_count(), 3);
    assert_eq!(table.columns[0].column_type, ColumnType::String);

    // Supplied statistics are recomputed, never trusted
    assert_eq!(table.columns[0].non_null_count, 3);
    assert_eq!(table.columns[0].null_count, 0);
    assert_eq!(table.columns[1].non_null_count, 1);
    assert_eq!(table.columns[1].null_count, 2);

    assert_eq!(table.cell(0, 1), Some(&Cell::Number(30.0)));
    // Explicit null and missing field both decode to null; extra keys are ignored
    assert_eq!(table.cell(1, 1), Some(&Cell::Null));
    assert_eq!(table.cell(2, 1), Some(&Cell::Null));
}

#[test]
fn test_table_from_json_keeps_date_strings_as_strings() {
    let json = r#"{
        "columns": [{"name": "when", "type": "date"}],
        "rows": [{"when": "2024-01-15"}]
    }"#;

    let table = table_from_json(json).unwrap();

    // The declared type stays a statement of intent; the cell is a string
    // until a cast step refines it
    assert_eq!(table.columns[0].column_type, ColumnType::Date);
    assert_eq!(
        table.cell(0, 0),
        Some(&Cell::String("2024-01-15".to_string()))
    );
}

#[test]
fn test_table_from_json_rejects_duplicate_columns() {
    let json = r#"{
        "columns": [{"name": "a", "type": "string"}, {"name": "a", "type": "number"}],
        "rows": []
    }"#;

    let result = table_from_json(json);

    assert!(matches!(result, Err(WireError::Table(_))));
}

#[test]
fn test_table_to_json_shape() {
    let table = Table::from_rows(
        vec![
            ColumnMeta::new("name", ColumnType::String),
            ColumnMeta::new("when", ColumnType::Date),
        ],
        vec![Row::new(vec![
            Cell::String("Alice".to_string()),
            Cell::Date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()),
        ])],
    )
    .unwrap();

    let json = table_to_json(&table).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["rowCount"], 1);
    assert_eq!(value["columns"][0]["nonNullCount"], 1);
    assert_eq!(value["columns"][1]["type"], "date");
    assert_eq!(value["rows"][0]["name"], "Alice");
    // Dates serialize as ISO strings
    assert_eq!(value["rows"][0]["when"], "2024-01-15");
    assert_eq!(value["warnings"], serde_json::json!([]));
}

#[test]
fn test_table_json_round_trip() {
    let original = Table::from_rows(
        vec![
            ColumnMeta::new("name", ColumnType::String),
            ColumnMeta::new("age", ColumnType::Number),
            ColumnMeta::new("active", ColumnType::Boolean),
        ],
        vec![
            Row::new(vec![
                Cell::String("Alice".to_string()),
                Cell::Number(30.0),
                Cell::Boolean(true),
            ]),
            Row::new(vec![Cell::String("Bob".to_string()), Cell::Null, Cell::Boolean(false)]),
        ],
    )
    .unwrap();

    let decoded = table_from_json(&table_to_json(&original).unwrap()).unwrap();

    assert_eq!(decoded, original);
}

#[test]
fn test_steps_from_json() {
    let json = r#"[
        {"id": "s1", "type": "trim", "config": {}},
        {"id": "s2", "type": "cast_column", "config": {"column": "age", "targetType": "number", "onError": "skip"}},
        {"id": "s3", "type": "rename_column", "config": {"oldName": "age", "newName": "years"}},
        {"id": "s4", "type": "unpivot", "config": {"idColumns": ["name"], "valueColumns": ["years"]}},
        {"id": "s5", "type": "split_column", "config": {"column": "name", "method": "delimiter", "delimiter": " ", "newColumns": ["first", "last"]}},
        {"id": "s6", "type": "sort", "config": {"keys": [{"name": "name", "direction": "asc"}], "nullsPosition": "first"}},
        {"id": "s7", "type": "fill_down", "config": {"columns": ["name"], "treatWhitespaceAsEmpty": true}},
        {"id": "s8", "type": "filter", "config": {"column": "years", "operator": "greater_or_equal", "value": 18}}
    ]"#;

    let steps = steps_from_json(json).unwrap();
    assert_eq!(steps.len(), 8);

    match &steps[0].config {
        StepConfig::Trim(config) => assert_eq!(config.columns, None),
        other => panic!("unexpected variant: {}", other.kind()),
    }

    match &steps[1].config {
        StepConfig::CastColumn(config) => {
            assert_eq!(config.target_type, ColumnType::Number);
            assert_eq!(config.on_error, CastMode::Skip);
            assert_eq!(config.format, None);
        }
        other => panic!("unexpected variant: {}", other.kind()),
    }

    match &steps[3].config {
        StepConfig::Unpivot(config) => {
            // Omitted names fall back to their defaults
            assert_eq!(config.variable_column_name, "variable");
            assert_eq!(config.value_column_name, "value");
        }
        other => panic!("unexpected variant: {}", other.kind()),
    }

    match &steps[4].config {
        StepConfig::SplitColumn(config) => {
            assert_eq!(
                config.method,
                SplitMethod::Delimiter {
                    delimiter: " ".to_string()
                }
            );
            assert_eq!(
                config.new_columns,
                vec!["first".to_string(), "last".to_string()]
            );
        }
        other => panic!("unexpected variant: {}", other.kind()),
    }

    match &steps[5].config {
        StepConfig::Sort(config) => assert_eq!(config.nulls_position, NullsPosition::First),
        other => panic!("unexpected variant: {}", other.kind()),
    }

    match &steps[6].config {
        StepConfig::FillDown(config) => assert!(config.treat_whitespace_as_empty),
        other => panic!("unexpected variant: {}", other.kind()),
    }

    match &steps[7].config {
        StepConfig::Filter(config) => {
            assert_eq!(config.operator, FilterOperator::GreaterOrEqual);
            assert_eq!(config.value, Some(Cell::Number(18.0)));
        }
        other => panic!("unexpected variant: {}", other.kind()),
    }
}

#[test]
fn test_steps_from_json_rejects_unknown_tag() {
    let json = r#"[{"id": "s1", "type": "explode", "config": {}}]"#;

    assert!(matches!(steps_from_json(json), Err(WireError::Json(_))));
}

#[test]
fn test_steps_from_json_rejects_duplicate_ids() {
    let json = r#"[
        {"id": "s1", "type": "deduplicate", "config": {"columns": null}},
        {"id": "s1", "type": "trim", "config": {}}
    ]"#;

    match steps_from_json(json) {
        Err(WireError::DuplicateStepId(id)) => assert_eq!(id, "s1"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_steps_from_json_rejects_malformed_config() {
    // Missing required field
    let json = r#"[{"id": "s1", "type": "filter", "config": {"operator": "equals", "value": 1}}]"#;
    assert!(matches!(steps_from_json(json), Err(WireError::Json(_))));

    // Unknown operator
    let json =
        r#"[{"id": "s1", "type": "filter", "config": {"column": "a", "operator": "astral", "value": 1}}]"#;
    assert!(matches!(steps_from_json(json), Err(WireError::Json(_))));
}

#[test]
fn test_steps_json_round_trip() {
    let steps = vec![
        TransformStep {
            id: "s1".to_string(),
            config: StepConfig::SplitColumn(SplitColumnConfig {
                column: "code".to_string(),
                method: SplitMethod::FixedWidth {
                    widths: vec![2, 3],
                },
                new_columns: vec!["a".to_string(), "b".to_string()],
            }),
        },
        TransformStep {
            id: "s2".to_string(),
            config: StepConfig::CastColumn(CastColumnConfig {
                column: "when".to_string(),
                target_type: ColumnType::Date,
                format: Some("%d.%m.%Y".to_string()),
                on_error: CastMode::Null,
            }),
        },
        TransformStep {
            id: "s3".to_string(),
            config: StepConfig::Pivot(PivotConfig {
                index_columns: vec!["region".to_string()],
                column_source: "quarter".to_string(),
                value_source: "sales".to_string(),
            }),
        },
        TransformStep {
            id: "s4".to_string(),
            config: StepConfig::Sort(SortConfig {
                keys: vec![SortKey {
                    name: "region".to_string(),
                    direction: SortDirection::Desc,
                }],
                nulls_position: NullsPosition::Last,
            }),
        },
    ];

    let decoded = steps_from_json(&steps_to_json(&steps).unwrap()).unwrap();

    assert_eq!(decoded, steps);
}

#[test]
fn test_run_to_json() {
    let table = Table::from_rows(
        vec![ColumnMeta::new("name", ColumnType::String)],
        vec![Row::new(vec![Cell::String("  Alice".to_string())])],
    )
    .unwrap();

    let steps = vec![
        TransformStep {
            id: "s1".to_string(),
            config: StepConfig::Trim(TextConfig {
                columns: Some(vec!["name".to_string()]),
            }),
        },
        TransformStep {
            id: "s2".to_string(),
            config: StepConfig::RemoveColumn(RemoveColumnConfig {
                columns: vec!["ghost".to_string()],
            }),
        },
    ];

    let run = execute_pipeline(&table, &steps);
    let json = run_to_json(&run).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["stepResults"][0]["stepId"], "s1");
    assert_eq!(value["stepResults"][0]["success"], true);
    assert_eq!(value["stepResults"][0]["rowsAffected"], 1);
    // Successful outcomes omit the error key entirely
    assert!(value["stepResults"][0].get("error").is_none());

    assert_eq!(value["stepResults"][1]["success"], false);
    assert!(value["stepResults"][1]["error"]
        .as_str()
        .unwrap()
        .contains("ghost"));

    assert_eq!(value["table"]["rowCount"], 1);
    assert_eq!(value["table"]["rows"][0]["name"], "Alice");
}
