//! Boolean, UUID and time converters.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use uuid::Uuid;

use super::numeric::normalize_for_parsing;
use super::{Converter, ValueConverter};
use crate::error::ConversionError;
use crate::value::Value;

/// `strftime` format for RFC 3339 timestamps such as `2024-03-01T12:30:00Z`.
pub const RFC3339: &str = "%+";

/// `strftime` format for calendar dates such as `2024-03-01`, read as
/// midnight UTC.
pub const DATE: &str = "%Y-%m-%d";

/// Converts to a boolean.
///
/// Accepts booleans and the texts `1 t T TRUE true True` and
/// `0 f F FALSE false False`.
pub fn boolean() -> Converter {
    Arc::new(BoolConverter)
}

/// Converts to a UUID.
///
/// Text is parsed in any of the usual UUID notations. A 16-byte
/// `Value::Bytes` is read as the raw UUID.
pub fn uuid() -> Converter {
    Arc::new(UuidConverter)
}

/// Converts text to a time by trying each `strftime` format in order.
///
/// Formats without an offset are read as UTC, and date-only formats as
/// midnight UTC. `Value::Time` input is passed through.
///
/// # Example
///
/// ```rust
/// use mapparse::converter::{time, DATE, RFC3339};
/// use mapparse::Value;
///
/// let c = time([RFC3339, DATE]);
/// let parsed = c.convert(Value::from("2024-03-01")).unwrap();
/// assert_eq!(parsed.to_string(), "2024-03-01T00:00:00Z");
/// ```
pub fn time<I, S>(formats: I) -> Converter
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Arc::new(TimeConverter {
        formats: formats.into_iter().map(Into::into).collect(),
    })
}

#[derive(Debug, Clone, Copy)]
struct BoolConverter;

impl ValueConverter for BoolConverter {
    fn convert(&self, value: Value) -> Result<Value, ConversionError> {
        match normalize_for_parsing(value) {
            absent @ (Value::Null | Value::Undefined) => Ok(absent),
            Value::Bool(b) => Ok(Value::Bool(b)),
            Value::String(s) => parse_bool(&s).map(Value::Bool),
            _ => Err(ConversionError::NotABoolean),
        }
    }
}

fn parse_bool(s: &str) -> Result<bool, ConversionError> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ConversionError::NotABoolean),
    }
}

#[derive(Debug, Clone, Copy)]
struct UuidConverter;

impl ValueConverter for UuidConverter {
    fn convert(&self, value: Value) -> Result<Value, ConversionError> {
        let parsed = match normalize_for_parsing(value) {
            absent @ (Value::Null | Value::Undefined) => return Ok(absent),
            Value::Uuid(u) => Ok(u),
            Value::Bytes(bytes) => Uuid::from_slice(&bytes),
            other => Uuid::parse_str(other.to_string().trim()),
        };
        parsed
            .map(Value::Uuid)
            .map_err(|_| ConversionError::NotAUuid)
    }
}

#[derive(Debug, Clone)]
struct TimeConverter {
    formats: Vec<String>,
}

impl ValueConverter for TimeConverter {
    fn convert(&self, value: Value) -> Result<Value, ConversionError> {
        match normalize_for_parsing(value) {
            absent @ (Value::Null | Value::Undefined) => Ok(absent),
            Value::Time(t) => Ok(Value::Time(t)),
            Value::String(s) => self
                .formats
                .iter()
                .find_map(|format| parse_time(&s, format))
                .map(Value::Time)
                .ok_or(ConversionError::NotATime),
            _ => Err(ConversionError::NotATime),
        }
    }
}

fn parse_time(s: &str, format: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(t) = DateTime::parse_from_str(s, format) {
        return Some(t);
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(s, format) {
        return Some(t.and_utc().fixed_offset());
    }
    NaiveDate::parse_from_str(s, format)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| t.and_utc().fixed_offset())
}
