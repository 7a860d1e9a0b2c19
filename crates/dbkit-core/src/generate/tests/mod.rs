
use crate::{
    dialect::{AnsiDialect, MySqlDialect, PostgresDialect},
    error::{ErrorClass, ErrorOrigin, InternalError},
    generate::{
        AttributeBinding, EditorBuffer, GenerateAction, RowSelection, Selection, SelectionKind,
        SqlGenerator, StatementKind, TextSink, WriterSink, deliver,
    },
    model::{Attribute, DataKind, Entity, EntityName, Row},
    test_support::{BrokenMetadata, employee, employee_without_key},
    value::{DisplayFormat, Value},
};
use chrono::{TimeZone, Utc};

// ---- helpers -----------------------------------------------------------

fn table(kind: StatementKind, entity: &Entity) -> String {
    SqlGenerator::new().generate(kind, entity, None).unwrap()
}

fn ansi() -> SqlGenerator {
    SqlGenerator::new().with_dialect(Box::new(AnsiDialect))
}

fn employee_rows(rows: Vec<Vec<Value>>) -> RowSelection {
    let entity = employee();
    RowSelection::positional(
        entity.attribute_slice(),
        rows.into_iter().map(Row::new).collect(),
    )
}

struct FailingSink;

impl TextSink for FailingSink {
    fn accept(&mut self, _text: &str) -> Result<(), InternalError> {
        Err(InternalError::interface_internal("clipboard unavailable"))
    }
}

// ---- table-driven ------------------------------------------------------

#[test]
fn select_lists_every_attribute() {
    assert_eq!(
        table(StatementKind::Select, &employee()),
        "SELECT ID, NAME, HIRE_DATE\nFROM EMPLOYEE;\n"
    );
}

#[test]
fn insert_uses_default_literals() {
    assert_eq!(
        table(StatementKind::Insert, &employee()),
        "INSERT INTO EMPLOYEE\n(ID, NAME, HIRE_DATE)\nVALUES(0, '', '');\n"
    );
}

#[test]
fn update_sets_value_attributes_and_filters_on_key() {
    assert_eq!(
        table(StatementKind::Update, &employee()),
        "UPDATE EMPLOYEE\nSET NAME='', HIRE_DATE=''\nWHERE ID=0;\n"
    );
}

#[test]
fn update_without_key_has_no_where_clause() {
    assert_eq!(
        table(StatementKind::Update, &employee_without_key()),
        "UPDATE EMPLOYEE\nSET ID=0, NAME='', HIRE_DATE='';\n"
    );
}

#[test]
fn delete_filters_on_key() {
    assert_eq!(
        table(StatementKind::Delete, &employee()),
        "DELETE FROM EMPLOYEE\nWHERE ID=0;\n"
    );
}

#[test]
fn delete_without_key_filters_on_every_attribute() {
    assert_eq!(
        table(StatementKind::Delete, &employee_without_key()),
        "DELETE FROM EMPLOYEE\nWHERE ID=0 AND NAME='' AND HIRE_DATE='';\n"
    );
}

#[test]
fn merge_with_key() {
    assert_eq!(
        table(StatementKind::Merge, &employee()),
        "MERGE INTO EMPLOYEE AS tgt\n\
         USING SOURCE_TABLE AS src\n\
         ON (tgt.ID=src.ID)\n\
         WHEN MATCHED\n\
         THEN UPDATE SET\n\
         tgt.NAME=src.NAME, tgt.HIRE_DATE=src.HIRE_DATE\n\
         WHEN NOT MATCHED\n\
         THEN INSERT (ID, NAME, HIRE_DATE)\n\
         VALUES (src.ID, src.NAME, src.HIRE_DATE);\n"
    );
}

#[test]
fn merge_without_key_drops_on_but_keeps_when_clauses() {
    assert_eq!(
        table(StatementKind::Merge, &employee_without_key()),
        "MERGE INTO EMPLOYEE AS tgt\n\
         USING SOURCE_TABLE AS src\n\
         WHEN MATCHED\n\
         THEN UPDATE SET\n\
         tgt.ID=src.ID, tgt.NAME=src.NAME, tgt.HIRE_DATE=src.HIRE_DATE\n\
         WHEN NOT MATCHED\n\
         THEN INSERT (ID, NAME, HIRE_DATE)\n\
         VALUES (src.ID, src.NAME, src.HIRE_DATE);\n"
    );
}

#[test]
fn schema_default_is_followed_by_placeholder() {
    let entity = Entity::new(
        EntityName::new("T"),
        vec![
            Attribute::new("QTY", 0, DataKind::Numeric).with_default("5"),
            Attribute::new("ACTIVE", 1, DataKind::Boolean).with_default("true"),
            Attribute::new("DOC", 2, DataKind::Content),
        ],
    )
    .unwrap();

    assert_eq!(
        table(StatementKind::Insert, &entity),
        "INSERT INTO T\n(QTY, ACTIVE, DOC)\nVALUES(50, truefalse, ?);\n"
    );
}

#[test]
fn dialect_quotes_qualified_names() {
    let entity = Entity::new(
        EntityName::new("order").in_schema("Sales"),
        vec![
            Attribute::new("id", 0, DataKind::Numeric).in_unique_key(),
            Attribute::new("Total", 1, DataKind::Numeric),
        ],
    )
    .unwrap();
    let generator = SqlGenerator::new().with_dialect(Box::new(PostgresDialect));

    assert_eq!(
        generator
            .generate(StatementKind::Select, &entity, None)
            .unwrap(),
        "SELECT id, \"Total\"\nFROM \"Sales\".\"order\";\n"
    );
}

#[test]
fn metadata_failure_aborts_generation() {
    let broken = BrokenMetadata {
        name: EntityName::new("BROKEN"),
    };

    for kind in SelectionKind::TableSelected.statements() {
        let err = SqlGenerator::new()
            .generate(*kind, &broken, None)
            .unwrap_err();
        assert_eq!(err.origin, ErrorOrigin::Metadata, "{kind}");
    }
}

// ---- row-driven --------------------------------------------------------

#[test]
fn row_insert_renders_values() {
    let rows = employee_rows(vec![vec![
        Value::Int(1),
        Value::from("O'Brien"),
        Value::Null,
    ]]);

    assert_eq!(
        ansi()
            .generate(StatementKind::Insert, &employee(), Some(&rows))
            .unwrap(),
        "INSERT INTO EMPLOYEE\n(ID, NAME, HIRE_DATE)\nVALUES(1, 'O''Brien', NULL);\n"
    );
}

#[test]
fn without_dialect_values_are_not_escaped() {
    let rows = employee_rows(vec![vec![
        Value::Int(1),
        Value::from("O'Brien"),
        Value::Null,
    ]]);

    assert_eq!(
        SqlGenerator::new()
            .generate(StatementKind::Insert, &employee(), Some(&rows))
            .unwrap(),
        "INSERT INTO EMPLOYEE\n(ID, NAME, HIRE_DATE)\nVALUES(1, 'O'Brien', NULL);\n"
    );
}

#[test]
fn one_block_per_selected_row() {
    let rows = employee_rows(vec![
        vec![Value::Int(1), Value::from("Ada"), Value::Null],
        vec![Value::Int(2), Value::from("Grace"), Value::Null],
    ]);

    assert_eq!(
        ansi()
            .generate(StatementKind::SelectByKey, &employee(), Some(&rows))
            .unwrap(),
        "SELECT NAME, HIRE_DATE\nFROM EMPLOYEE\nWHERE ID=1;\n\
         SELECT NAME, HIRE_DATE\nFROM EMPLOYEE\nWHERE ID=2;\n"
    );
    assert_eq!(
        ansi()
            .generate(StatementKind::DeleteByKey, &employee(), Some(&rows))
            .unwrap(),
        "DELETE FROM EMPLOYEE\nWHERE ID=1;\nDELETE FROM EMPLOYEE\nWHERE ID=2;\n"
    );
}

#[test]
fn row_delete_without_key_uses_every_attribute() {
    let entity = employee_without_key();
    let rows = RowSelection::positional(
        entity.attribute_slice(),
        vec![Row::new(vec![Value::Int(7), Value::from("Ada"), Value::Null])],
    );

    assert_eq!(
        ansi()
            .generate(StatementKind::DeleteByKey, &entity, Some(&rows))
            .unwrap(),
        "DELETE FROM EMPLOYEE\nWHERE ID=7 AND NAME='Ada' AND HIRE_DATE=NULL;\n"
    );
}

#[test]
fn unbound_attributes_fall_back_to_default_literal() {
    let rows = RowSelection::new(
        vec![AttributeBinding::new("ID", 1), AttributeBinding::new("NAME", 0)],
        vec![Row::new(vec![Value::from("Ada"), Value::Int(9)])],
    );

    assert_eq!(
        ansi()
            .generate(StatementKind::Insert, &employee(), Some(&rows))
            .unwrap(),
        "INSERT INTO EMPLOYEE\n(ID, NAME, HIRE_DATE)\nVALUES(9, 'Ada', '');\n"
    );
}

#[test]
fn binding_past_row_end_is_an_invariant_violation() {
    let rows = RowSelection::new(
        vec![AttributeBinding::new("ID", 4)],
        vec![Row::new(vec![Value::Int(1)])],
    );

    let err = ansi()
        .generate(StatementKind::DeleteByKey, &employee(), Some(&rows))
        .unwrap_err();
    assert_eq!(err.class, ErrorClass::InvariantViolation);
    assert_eq!(err.origin, ErrorOrigin::Generate);
}

#[test]
fn timestamps_use_display_format() {
    let ts = Utc.with_ymd_and_hms(2023, 1, 15, 8, 30, 5).unwrap();
    let rows = employee_rows(vec![vec![
        Value::Int(1),
        Value::from("Ada"),
        Value::Timestamp(ts),
    ]]);

    let native = ansi()
        .generate(StatementKind::Insert, &employee(), Some(&rows))
        .unwrap();
    assert!(native.contains("VALUES(1, 'Ada', 2023-01-15 08:30:05.000);"));

    let ui = ansi()
        .with_format(DisplayFormat::Ui)
        .generate(StatementKind::Insert, &employee(), Some(&rows))
        .unwrap();
    assert!(ui.contains("VALUES(1, 'Ada', 2023-01-15 08:30:05);"));
}

#[test]
fn mysql_escapes_backslashes_in_values() {
    let rows = employee_rows(vec![vec![
        Value::Int(1),
        Value::from(r"C:\tmp"),
        Value::Null,
    ]]);
    let generator = SqlGenerator::new().with_dialect(Box::new(MySqlDialect));

    assert!(
        generator
            .generate(StatementKind::Insert, &employee(), Some(&rows))
            .unwrap()
            .contains(r"'C:\\tmp'")
    );
}

// ---- kind / selection --------------------------------------------------

#[test]
fn kind_and_row_mode_must_agree() {
    let rows = employee_rows(vec![vec![Value::Int(1), Value::from("Ada"), Value::Null]]);

    for kind in [StatementKind::SelectByKey, StatementKind::DeleteByKey] {
        let err = ansi().generate(kind, &employee(), None).unwrap_err();
        assert!(err.is_unsupported(), "{kind}");
    }
    for kind in [
        StatementKind::Select,
        StatementKind::Update,
        StatementKind::Delete,
        StatementKind::Merge,
    ] {
        let err = ansi().generate(kind, &employee(), Some(&rows)).unwrap_err();
        assert!(err.is_unsupported(), "{kind}");
    }
}

#[test]
fn selection_maps_to_statement_kinds() {
    let entity = employee();
    let rows = employee_rows(vec![vec![Value::Int(1), Value::from("Ada"), Value::Null]]);
    let empty = RowSelection::default();

    assert_eq!(
        Selection::Table(&entity).available_statements(),
        [
            StatementKind::Select,
            StatementKind::Insert,
            StatementKind::Update,
            StatementKind::Delete,
            StatementKind::Merge,
        ]
    );
    assert_eq!(
        Selection::ResultRows {
            entity: Some(&entity),
            rows: &rows,
        }
        .available_statements(),
        [
            StatementKind::SelectByKey,
            StatementKind::Insert,
            StatementKind::DeleteByKey,
        ]
    );
    assert!(
        Selection::ResultRows {
            entity: None,
            rows: &rows,
        }
        .available_statements()
        .is_empty()
    );
    assert!(
        Selection::ResultRows {
            entity: Some(&entity),
            rows: &empty,
        }
        .available_statements()
        .is_empty()
    );
}

#[test]
fn statement_kind_parsing_and_labels() {
    assert_eq!(
        "select-by-key".parse::<StatementKind>().unwrap(),
        StatementKind::SelectByKey
    );
    assert_eq!(
        "DELETE BY KEY".parse::<StatementKind>().unwrap(),
        StatementKind::DeleteByKey
    );
    assert!("upsert".parse::<StatementKind>().is_err());
    assert_eq!(StatementKind::DeleteByKey.label(), "DELETE by Unique Key");

    for kind in StatementKind::ALL {
        assert!(kind.supports_table() || kind.supports_rows(), "{kind}");
        assert_eq!(kind.to_string().parse::<StatementKind>().unwrap(), kind);
    }
}

// ---- delivery ----------------------------------------------------------

#[test]
fn editor_buffer_replaces_selection() {
    let mut editor = EditorBuffer::new("-- header\nstale;\n");
    editor.select(10..17);
    editor.accept("SELECT 1;\n").unwrap();

    assert_eq!(editor.text(), "-- header\nSELECT 1;\n");
    assert_eq!(editor.selection(), 20..20);
}

#[test]
fn editor_buffer_rejects_out_of_range_selection() {
    let mut editor = EditorBuffer::new("abc");
    editor.select(2..9);

    assert!(editor.accept("x").is_err());
    assert_eq!(editor.text(), "abc");
}

#[test]
fn failing_sink_does_not_block_others() {
    let mut editor = EditorBuffer::default();
    let mut failing = FailingSink;
    let mut writer = WriterSink::new(Vec::new());

    let delivered = deliver("SELECT 1;\n", &mut [&mut editor, &mut failing, &mut writer]);

    assert_eq!(delivered, 2);
    assert_eq!(editor.text(), "SELECT 1;\n");
    assert_eq!(writer.into_inner(), b"SELECT 1;\n");
}

#[test]
fn action_delivers_generated_text() {
    let generator = ansi();
    let action = GenerateAction::new(StatementKind::Insert, &generator);
    let mut editor = EditorBuffer::default();

    let sql = action.run(&employee(), None, &mut [&mut editor]).unwrap();

    assert_eq!(action.label(), "INSERT");
    assert_eq!(editor.text(), sql);
}

#[test]
fn failed_action_delivers_nothing() {
    let generator = ansi();
    let action = GenerateAction::new(StatementKind::Select, &generator);
    let broken = BrokenMetadata {
        name: EntityName::new("BROKEN"),
    };
    let mut editor = EditorBuffer::new("keep");

    assert!(action.run(&broken, None, &mut [&mut editor]).is_err());
    assert_eq!(editor.text(), "keep");
}
