//! Integration tests for parsing maps into records.

use mapparse::converter::{
    decimal, if_defined, int32, int64, not_nil, required, single_line_string, time, uuid,
    RFC3339,
};
use mapparse::{ConversionError, FieldErrors, Map, Record, Type, Value};
use serde_json::json;

fn input(value: serde_json::Value) -> Map {
    Value::from(value).into_map().unwrap()
}

/// Helper to extract the error value from a Validation
fn unwrap_failure<T: std::fmt::Debug, E>(v: stillwater::Validation<T, E>) -> E {
    v.into_result().unwrap_err()
}

fn two_ints() -> Type {
    Type::new()
        .field("a", [required(), int32()])
        .field("b", [required(), int32()])
}

#[test]
fn test_parse_required_integers() {
    let record = two_ints().parse(input(json!({"a": 1, "b": 2})));

    assert_eq!(record.get("a"), &Value::Int32(1));
    assert_eq!(record.get("b"), &Value::Int32(2));
    assert!(record.errors().is_none());
}

#[test]
fn test_invalid_integer_is_keyed_by_field() {
    let ty = Type::new().field("age", [int32()]);
    let record = ty.parse(input(json!({"age": "abc"})));

    let errors = record.errors().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.get("age"), Some(&ConversionError::NotANumber));
}

#[test]
fn test_missing_required_field() {
    let ty = Type::new().field("name", [required()]);
    let record = ty.parse(input(json!({"misspelled": "adam"})));

    let errors = record.errors().unwrap();
    assert_eq!(errors.get("name"), Some(&ConversionError::Undefined));
    assert_eq!(errors.to_string(), "name must be defined");
}

#[test]
#[should_panic(expected = "\"z\" is not a field of type")]
fn test_pick_unknown_field_fails_fast() {
    let record = two_ints().parse(input(json!({"a": 1, "b": 2})));
    record.pick(&["a", "b", "z"]);
}

#[test]
fn test_fields_without_converters_keep_raw_value() {
    let ty = Type::new().field("raw", []).field("nested", []);
    let record = ty.parse(input(json!({"raw": " 12 ", "nested": {"k": [1, null]}})));

    assert_eq!(record.get("raw"), &Value::from(" 12 "));
    assert_eq!(
        record.get("nested"),
        &Value::from(json!({"k": [1, null]}))
    );
}

#[test]
fn test_required_accepts_zero_and_false() {
    let ty = Type::new().field("v", [required()]);

    for value in [json!(0), json!(false), json!(" "), json!([]), json!({})] {
        let record = ty.parse(input(json!({ "v": value.clone() })));
        assert!(record.is_valid(), "{value} should be accepted");
    }

    for value in [json!(null), json!("")] {
        let record = ty.parse(input(json!({ "v": value.clone() })));
        assert!(!record.is_valid(), "{value} should be rejected");
    }
    assert!(!ty.parse(Map::new()).is_valid());
}

#[test]
fn test_every_failure_is_reported() {
    let ty = Type::new()
        .field("id", [required(), uuid()])
        .field("name", [required(), single_line_string()])
        .field("price", [required(), decimal()])
        .field("at", [time([RFC3339])]);

    let record = ty.parse(input(json!({
        "id": "not-a-uuid",
        "price": "cheap",
        "at": "yesterday"
    })));

    let errors = record.errors().unwrap();
    assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["at", "id", "name", "price"]);
    assert_eq!(
        errors.to_string(),
        "at not a valid time, id not a valid UUID, name must be defined, price not a valid number"
    );
}

#[test]
fn test_errors_json() {
    let ty = Type::new()
        .field("a", [required(), int32()])
        .field("b", [int32()]);
    let record = ty.parse(input(json!({"b": "99999999999"})));

    assert_eq!(
        serde_json::to_value(record.errors().unwrap()).unwrap(),
        json!({"a": "must be defined", "b": "too large"})
    );
    assert_eq!(serde_json::to_value(FieldErrors::new()).unwrap(), json!({}));
}

#[test]
fn test_reparse_of_attrs_is_stable() {
    let address = Type::new().field("city", [required(), single_line_string()]);
    let ty = Type::new()
        .field("id", [required(), int64()])
        .field("score", [decimal()])
        .field("address", [address.into_converter()]);

    let first = ty.parse(input(json!({
        "id": "7",
        "score": "1.50",
        "address": {"city": " Bergen\n"}
    })));
    assert!(first.is_valid());

    let second = ty.parse(first.attrs().clone());
    assert!(second.is_valid());
    assert_eq!(second, first);
}

#[test]
fn test_into_validation_failure() {
    let record = two_ints().parse(input(json!({"a": "x"})));
    let errors = unwrap_failure(record.into_validation());
    assert!(errors.contains("a"));
    assert!(errors.contains("b"));
}

#[test]
fn test_patch_semantics() {
    let ty = Type::new()
        .field("name", [if_defined([not_nil(), single_line_string()])])
        .field("note", [single_line_string()]);

    let record = ty.parse(input(json!({"note": null})));
    assert!(record.is_valid());
    assert!(!record.attrs().contains_key("name"));
    assert_eq!(record.get("note"), &Value::Null);

    let record = ty.parse(input(json!({"name": null})));
    assert_eq!(
        record.errors().unwrap().get("name"),
        Some(&ConversionError::Nil)
    );
}

#[test]
fn test_record_serializes_converted_attrs() {
    let record: Record = two_ints().parse(input(json!({"a": "1", "b": 2, "extra": true})));
    assert_eq!(
        serde_json::to_value(Value::from(record)).unwrap(),
        json!({"a": 1, "b": 2})
    );
}
