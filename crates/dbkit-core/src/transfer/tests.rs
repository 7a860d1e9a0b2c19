use crate::{
    error::{ErrorClass, ErrorOrigin, InternalError},
    model::{DataKind, EntityName, Row},
    obs::{MetricsEvent, MetricsSink, with_metrics_sink},
    test_support::employee,
    transfer::{
        ConversionOutcome, DateTimePattern, EntityMapping, PatternError, ResultSet, RowError,
        StreamColumn, StreamResultSet, transfer_rows,
    },
    value::Value,
};
use chrono::{NaiveDate, TimeZone, Utc};
use std::cell::RefCell;

// ---- helpers -----------------------------------------------------------

fn adapter(format: Option<&str>) -> StreamResultSet {
    let mut rs = StreamResultSet::new(EntityMapping::from_entity(&employee()));
    rs.set_datetime_format(format).expect("valid pattern");
    rs
}

fn with_row(mut rs: StreamResultSet, values: Vec<Value>) -> StreamResultSet {
    rs.set_stream_row(Row::new(values)).expect("row matches mapping");
    rs
}

fn hire_date(format: &str, raw: Value) -> Value {
    let rs = with_row(
        adapter(Some(format)),
        vec![Value::Int(1), Value::from("Ada"), raw],
    );
    rs.attribute_value(2).expect("in bounds")
}

#[derive(Default)]
struct OutcomeCapture(RefCell<Vec<ConversionOutcome>>);

impl MetricsSink for OutcomeCapture {
    fn record(&self, event: MetricsEvent) {
        if let MetricsEvent::ValueRead { outcome } = event {
            self.0.borrow_mut().push(outcome);
        }
    }
}

// ---- conversion --------------------------------------------------------

#[test]
fn date_only_pattern_anchors_at_utc_midnight() {
    let value = hire_date("yyyy-MM-dd", Value::from("2023-01-15"));
    let expected = Utc.with_ymd_and_hms(2023, 1, 15, 0, 0, 0).unwrap();

    assert_eq!(value, Value::Timestamp(expected));
}

#[test]
fn local_datetime_is_anchored_at_utc() {
    let value = hire_date("yyyy-MM-dd HH:mm:ss", Value::from("2023-01-15 08:30:05"));
    let expected = Utc.with_ymd_and_hms(2023, 1, 15, 8, 30, 5).unwrap();

    assert_eq!(value, Value::Timestamp(expected));
}

#[test]
fn zoned_datetime_keeps_its_offset() {
    let value = hire_date(
        "yyyy-MM-dd'T'HH:mm:ssXXX",
        Value::from("2023-01-15T10:00:00+02:00"),
    );
    let expected = Utc.with_ymd_and_hms(2023, 1, 15, 8, 0, 0).unwrap();

    assert_eq!(value, Value::Timestamp(expected));
}

#[test]
fn zulu_designator_reads_as_utc() {
    let expected = Utc.with_ymd_and_hms(2023, 1, 15, 10, 0, 0).unwrap();

    for pattern in [
        "yyyy-MM-dd'T'HH:mm:ssXXX",
        "yyyy-MM-dd'T'HH:mm:ssXX",
        "yyyy-MM-dd'T'HH:mm:ssX",
        "yyyy-MM-dd'T'HH:mm:ssZZZZZ",
    ] {
        let value = hire_date(pattern, Value::from("2023-01-15T10:00:00Z"));
        assert_eq!(value, Value::Timestamp(expected), "pattern {pattern}");
    }
}

#[test]
fn lowercase_offset_fields_reject_zulu_designator() {
    let value = hire_date("yyyy-MM-dd'T'HH:mm:ssxxx", Value::from("2023-01-15T10:00:00Z"));

    assert_eq!(value, Value::from("2023-01-15T10:00:00Z"));
}

#[test]
fn hour_only_pattern_defaults_minutes_to_zero() {
    let value = hire_date("yyyy-MM-dd HH", Value::from("2023-01-15 08"));
    let expected = Utc.with_ymd_and_hms(2023, 1, 15, 8, 0, 0).unwrap();

    assert_eq!(value, Value::Timestamp(expected));
}

#[test]
fn unresolved_time_of_day_is_never_midnight() {
    // clock hour without an am/pm marker
    let value = hire_date("yyyy-MM-dd hh:mm", Value::from("2023-01-15 08:30"));
    assert_eq!(value, Value::from("2023-01-15 08:30"));

    let value = hire_date("yyyy-MM-dd hh:mm a", Value::from("2023-01-15 08:30 PM"));
    let expected = Utc.with_ymd_and_hms(2023, 1, 15, 20, 30, 0).unwrap();
    assert_eq!(value, Value::Timestamp(expected));
}

#[test]
fn date_with_offset_but_no_time_stays_raw() {
    let value = hire_date("yyyy-MM-ddXXX", Value::from("2023-01-15+02:00"));

    assert_eq!(value, Value::from("2023-01-15+02:00"));
}

#[test]
fn two_digit_years_fall_in_the_2000s() {
    for (raw, year) in [("99-01-15", 2099), ("70-01-15", 2070), ("05-01-15", 2005)] {
        let value = hire_date("yy-MM-dd", Value::from(raw));
        let expected = Utc.with_ymd_and_hms(year, 1, 15, 0, 0, 0).unwrap();
        assert_eq!(value, Value::Timestamp(expected), "input {raw}");
    }
}

#[test]
fn fractional_seconds_are_parsed() {
    let value = hire_date(
        "dd/MM/yyyy HH:mm:ss.SSS",
        Value::from("15/01/2023 08:30:05.250"),
    );
    let expected = Utc.with_ymd_and_hms(2023, 1, 15, 8, 30, 5).unwrap()
        + chrono::Duration::milliseconds(250);

    assert_eq!(value, Value::Timestamp(expected));
}

#[test]
fn unparseable_text_is_returned_unchanged() {
    let value = hire_date("yyyy-MM-dd", Value::from("not-a-date"));

    assert_eq!(value, Value::from("not-a-date"));
}

#[test]
fn blank_text_reads_as_null() {
    assert_eq!(hire_date("yyyy-MM-dd", Value::from("")), Value::Null);
    assert_eq!(hire_date("yyyy-MM-dd", Value::from("   ")), Value::Null);
}

#[test]
fn surrounding_whitespace_is_trimmed_before_parsing() {
    let value = hire_date("yyyy-MM-dd", Value::from(" 2023-01-15 "));
    let expected = Utc.with_ymd_and_hms(2023, 1, 15, 0, 0, 0).unwrap();

    assert_eq!(value, Value::Timestamp(expected));
}

#[test]
fn native_temporal_values_pass_through() {
    let date = NaiveDate::from_ymd_opt(2020, 2, 29).unwrap();
    assert_eq!(hire_date("yyyy-MM-dd", Value::Date(date)), Value::Date(date));

    let ts = Utc.with_ymd_and_hms(2020, 2, 29, 12, 0, 0).unwrap();
    assert_eq!(
        hire_date("yyyy-MM-dd", Value::Timestamp(ts)),
        Value::Timestamp(ts)
    );
}

#[test]
fn null_passes_through() {
    assert_eq!(hire_date("yyyy-MM-dd", Value::Null), Value::Null);
}

#[test]
fn non_datetime_columns_are_never_converted() {
    let rs = with_row(
        adapter(Some("yyyy-MM-dd")),
        vec![Value::Int(1), Value::from("2023-01-15"), Value::Null],
    );

    assert_eq!(rs.attribute_value(1).unwrap(), Value::from("2023-01-15"));
}

#[test]
fn no_format_means_no_conversion() {
    let rs = with_row(
        adapter(None),
        vec![Value::Int(1), Value::from("Ada"), Value::from("2023-01-15")],
    );

    assert_eq!(rs.attribute_value(2).unwrap(), Value::from("2023-01-15"));
}

#[test]
fn reads_report_their_conversion_outcome() {
    let rs = with_row(
        adapter(Some("yyyy-MM-dd")),
        vec![Value::Int(1), Value::from("Ada"), Value::from("2023-01-15")],
    );
    let capture = OutcomeCapture::default();

    with_metrics_sink(&capture, || {
        rs.attribute_value(0).unwrap();
        rs.attribute_value(2).unwrap();
    });

    assert_eq!(
        *capture.0.borrow(),
        vec![ConversionOutcome::Passthrough, ConversionOutcome::Converted]
    );
}

// ---- read contract -----------------------------------------------------

#[test]
fn index_past_mapping_is_rejected() {
    let rs = with_row(
        adapter(None),
        vec![Value::Int(1), Value::from("Ada"), Value::Null],
    );

    let err = rs.attribute_value(3).unwrap_err();
    assert_eq!(err.class, ErrorClass::InvariantViolation);
    assert_eq!(err.origin, ErrorOrigin::Transfer);
    assert_eq!(
        err.message,
        RowError::IndexOutOfBounds { index: 3, count: 3 }.to_string()
    );
}

#[test]
fn reading_before_a_row_is_installed_is_rejected() {
    let err = adapter(None).attribute_value(0).unwrap_err();

    assert_eq!(err.message, RowError::NoCurrentRow.to_string());
}

#[test]
fn row_length_must_match_mapping() {
    let mut rs = adapter(None);
    let err = rs
        .set_stream_row(Row::new(vec![Value::Int(1)]))
        .unwrap_err();

    assert_eq!(
        err,
        RowError::LengthMismatch {
            expected: 3,
            found: 1
        }
    );
    assert!(rs.current_row().is_none());
}

#[test]
fn new_row_replaces_previous_row() {
    let mut rs = with_row(
        adapter(None),
        vec![Value::Int(1), Value::from("Ada"), Value::Null],
    );
    rs.set_stream_row(Row::new(vec![Value::Int(2), Value::from("Grace"), Value::Null]))
        .unwrap();

    assert_eq!(rs.attribute_value(1).unwrap(), Value::from("Grace"));
}

#[test]
fn optional_capabilities_report_unavailable() {
    let mut rs = with_row(
        adapter(None),
        vec![Value::Int(1), Value::from("Ada"), Value::Null],
    );

    assert_eq!(rs.attribute_value_by_name("NAME").unwrap(), None);
    assert_eq!(rs.attribute_value_by_name("").unwrap(), None);
    assert_eq!(rs.attribute_value_meta(0), None);
    assert_eq!(rs.row_meta(), None);
    assert_eq!(rs.result_set_name(), None);
    assert!(!rs.next_row().unwrap());
    assert!(!rs.move_to(0).unwrap());

    // the window still holds the installed row
    assert_eq!(rs.attribute_value(0).unwrap(), Value::Int(1));
}

#[test]
fn close_is_idempotent() {
    let mut rs = adapter(None);
    rs.close();
    rs.close();
}

#[test]
fn meta_follows_the_mapping() {
    let mapping = EntityMapping::new(
        EntityName::new("IMPORT"),
        vec![
            StreamColumn::new("when", 0, DataKind::Datetime),
            StreamColumn::new("amount", 1, DataKind::Numeric),
        ],
    );
    let meta = StreamResultSet::new(mapping).meta();

    assert_eq!(meta.column_count(), 2);
    assert_eq!(meta.columns[0].name, "when");
    assert_eq!(meta.columns[0].data_kind, DataKind::Datetime);
    assert_eq!(meta.column("amount").map(|c| c.ordinal), Some(1));
}

// ---- producer ----------------------------------------------------------

#[test]
fn transfer_rows_pushes_every_row_through_the_adapter() {
    let mut rs = adapter(Some("yyyy-MM-dd"));
    let rows: Vec<Result<Row, InternalError>> = vec![
        Ok(Row::new(vec![Value::Int(1), Value::from("Ada"), Value::from("2023-01-15")])),
        Ok(Row::new(vec![Value::Int(2), Value::from("Grace"), Value::from("bogus")])),
    ];
    let mut producer = rows.into_iter();

    let mut seen = Vec::new();
    let count = transfer_rows(&mut producer, &mut rs, |rs| {
        seen.push(rs.attribute_value(2)?);
        Ok(())
    })
    .unwrap();

    assert_eq!(count, 2);
    assert!(matches!(seen[0], Value::Timestamp(_)));
    assert_eq!(seen[1], Value::from("bogus"));
}

#[test]
fn transfer_rows_stops_at_first_failure() {
    let mut rs = adapter(None);
    let rows = vec![
        Ok(Row::new(vec![Value::Int(1), Value::from("Ada"), Value::Null])),
        Err(InternalError::interface_internal("truncated input")),
        Ok(Row::new(vec![Value::Int(3), Value::from("Linus"), Value::Null])),
    ];
    let mut producer = rows.into_iter();

    let mut consumed = 0;
    let err = transfer_rows(&mut producer, &mut rs, |_| {
        consumed += 1;
        Ok(())
    })
    .unwrap_err();

    assert_eq!(consumed, 1);
    assert_eq!(err.origin, ErrorOrigin::Interface);
}

#[test]
fn transfer_rows_rejects_misshapen_rows() {
    let mut rs = adapter(None);
    let mut producer = std::iter::once(Ok::<_, InternalError>(Row::new(vec![Value::Int(1)])));

    let err = transfer_rows(&mut producer, &mut rs, |_| Ok(())).unwrap_err();

    assert_eq!(err.origin, ErrorOrigin::Transfer);
}

// ---- patterns ----------------------------------------------------------

#[test]
fn pattern_translation() {
    let cases = [
        ("yyyy-MM-dd", "%Y-%m-%d"),
        ("yy/M/d", "%y/%m/%d"),
        ("dd MMM uuuu", "%d %b %Y"),
        ("EEEE, MMMM d", "%A, %B %d"),
        ("hh:mm a", "%I:%M %p"),
        ("HH:mm:ss.SSSSSS", "%H:%M:%S.%6f"),
        ("yyyy-MM-dd'T'HH:mm:ssXXX", "%Y-%m-%dT%H:%M:%S%:z"),
        ("HHmm Z", "%H%M %z"),
        ("D 'o''clock' 100%", "%j o'clock 100%%"),
        ("''yyyy''", "'%Y'"),
    ];

    for (pattern, expected) in cases {
        let compiled = DateTimePattern::parse(pattern).unwrap();
        assert_eq!(compiled.chrono_format(), expected, "pattern {pattern}");
        assert_eq!(compiled.as_str(), pattern);
        assert_eq!(compiled.to_string(), pattern);
    }
}

#[test]
fn pattern_errors() {
    assert_eq!(DateTimePattern::parse(""), Err(PatternError::Empty));
    assert_eq!(DateTimePattern::parse("  "), Err(PatternError::Empty));
    assert_eq!(
        DateTimePattern::parse("yyyy-MM-dd'T"),
        Err(PatternError::UnterminatedQuote { position: 10 })
    );
    assert_eq!(
        DateTimePattern::parse("yyyy[-MM]"),
        Err(PatternError::OptionalSection { position: 4 })
    );
    assert_eq!(
        DateTimePattern::parse("HH:mm z"),
        Err(PatternError::UnsupportedField {
            letter: 'z',
            width: 1,
            position: 6
        })
    );
    assert_eq!(
        DateTimePattern::parse("HH:mm ZZZZ"),
        Err(PatternError::UnsupportedField {
            letter: 'Z',
            width: 4,
            position: 6
        })
    );
    assert_eq!(
        DateTimePattern::parse("ss.SS"),
        Err(PatternError::UnsupportedField {
            letter: 'S',
            width: 2,
            position: 3
        })
    );
}

#[test]
fn invalid_pattern_keeps_previous_format() {
    let mut rs = adapter(Some("yyyy-MM-dd"));
    let err = rs.set_datetime_format(Some("VV")).unwrap_err();

    assert!(matches!(err, PatternError::UnsupportedField { letter: 'V', .. }));
    assert_eq!(rs.datetime_format().map(DateTimePattern::as_str), Some("yyyy-MM-dd"));

    let internal = InternalError::from(err);
    assert!(internal.is_unsupported());
    assert_eq!(internal.origin, ErrorOrigin::Pattern);
}
