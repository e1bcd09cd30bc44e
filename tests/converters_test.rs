//! Integration tests for the built-in converters used through a type.

use mapparse::converter::{
    allow_strings, apply_chain, boolean, float32, from_fn, greater_than_or_equal, int32, int64,
    less_than, matches, max_len, min_len, multi_line_string, nilify_empty, required,
    single_line_string,
};
use mapparse::{ConversionError, Map, Type, Value};
use serde_json::json;

fn input(value: serde_json::Value) -> Map {
    Value::from(value).into_map().unwrap()
}

#[test]
fn test_single_line_string_strips_line_break() {
    let c = single_line_string();
    assert_eq!(c.convert(Value::from("a\r\n")), Ok(Value::from("a")));
}

#[test]
fn test_multi_line_string_keeps_lines() {
    let c = multi_line_string();
    assert_eq!(
        c.convert(Value::from("first\nsecond\u{0000}")),
        Ok(Value::from("first\nsecond "))
    );
}

#[test]
fn test_blank_form_values_become_null() {
    let ty = Type::new()
        .field("n", [int32()])
        .field("flag", [boolean()])
        .field("ratio", [float32()]);

    let record = ty.parse(input(json!({"n": "  ", "flag": "", "ratio": "\t"})));
    assert!(record.is_valid());
    assert_eq!(record.get("n"), &Value::Null);
    assert_eq!(record.get("flag"), &Value::Null);
    assert_eq!(record.get("ratio"), &Value::Null);
}

#[test]
fn test_blank_required_number_is_nil_after_parsing() {
    let chain = [int32(), required()];
    assert_eq!(apply_chain(Value::from(" "), &chain), Err(ConversionError::Nil));
}

#[test]
fn test_width_overflow_is_a_range_error() {
    assert_eq!(
        int32().convert(Value::from(3_000_000_000i64)),
        Err(ConversionError::TooLarge)
    );
    assert_eq!(
        int32().convert(Value::from(-3_000_000_000i64)),
        Err(ConversionError::TooSmall)
    );
    assert_eq!(
        int64().convert(Value::from(u64::MAX)),
        Err(ConversionError::TooLarge)
    );
}

#[test]
fn test_length_constraints_chain() {
    let ty = Type::new().field(
        "username",
        [required(), single_line_string(), min_len(3), max_len(8)],
    );

    assert!(ty.parse(input(json!({"username": " bob "}))).is_valid());
    assert_eq!(
        ty.parse(input(json!({"username": " bo "})))
            .errors()
            .unwrap()
            .get("username"),
        Some(&ConversionError::TooShort)
    );
    assert_eq!(
        ty.parse(input(json!({"username": "bartholomew"})))
            .errors()
            .unwrap()
            .get("username"),
        Some(&ConversionError::TooLong)
    );
}

#[test]
fn test_range_chain() {
    let ty = Type::new().field(
        "qty",
        [required(), int32(), greater_than_or_equal(1), less_than(100)],
    );

    assert_eq!(ty.parse(input(json!({"qty": "5"}))).get("qty"), &Value::Int32(5));
    assert_eq!(
        ty.parse(input(json!({"qty": 0}))).errors().unwrap().get("qty"),
        Some(&ConversionError::TooSmall)
    );
    assert_eq!(
        ty.parse(input(json!({"qty": 100}))).errors().unwrap().get("qty"),
        Some(&ConversionError::TooLarge)
    );
}

#[test]
fn test_enumerated_values() {
    let ty = Type::new().field(
        "color",
        [nilify_empty(), allow_strings(["red", "green", "blue"])],
    );

    assert!(ty.parse(input(json!({"color": "red"}))).is_valid());
    assert!(ty.parse(input(json!({"color": ""}))).is_valid());
    assert_eq!(
        ty.parse(input(json!({"color": "pink"})))
            .errors()
            .unwrap()
            .to_string(),
        "color not allowed value"
    );
}

#[test]
fn test_pattern_converter() {
    let ty = Type::new().field("zip", [single_line_string(), matches(r"^\d{5}$").unwrap()]);

    assert!(ty.parse(input(json!({"zip": " 12345 "}))).is_valid());
    let record = ty.parse(input(json!({"zip": "1234"})));
    assert_eq!(record.errors().unwrap().get("zip").unwrap().code(), "pattern_mismatch");
}

#[test]
fn test_custom_converter_error_message() {
    let even = from_fn(|value: Value| match value.as_i64() {
        Some(n) if n % 2 != 0 => Err(ConversionError::custom("must be even")),
        _ => Ok(value),
    });
    let ty = Type::new().field("n", [int64(), even]);

    let record = ty.parse(input(json!({"n": "3"})));
    assert_eq!(record.errors().unwrap().to_string(), "n must be even");
    assert!(ty.parse(input(json!({"n": "4"}))).is_valid());
}
