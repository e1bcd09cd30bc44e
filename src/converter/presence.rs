//! Presence rules: nil, undefined and empty values.
//!
//! A field can be absent from the input (`Undefined`), present but null
//! (`Null`), or present with an empty value. These converters decide which
//! of those states a field accepts.

use std::sync::Arc;

use super::{apply_chain, from_fn, Converter, ValueConverter};
use crate::error::ConversionError;
use crate::value::Value;

/// Fails with "cannot be nil" if the value is `Null`. `Undefined` passes.
pub fn not_nil() -> Converter {
    from_fn(|value| match value {
        Value::Null => Err(ConversionError::Nil),
        other => Ok(other),
    })
}

/// Rejects absent, nil and empty-text values, reporting which one failed:
/// "must be defined", "cannot be nil" or "cannot be empty".
///
/// Put it first in a chain; the parsing converters turn blank text into
/// `Null`, which `required` would then report as "cannot be nil".
pub fn required() -> Converter {
    Arc::new(Required)
}

#[derive(Debug, Clone, Copy)]
struct Required;

impl ValueConverter for Required {
    fn convert(&self, value: Value) -> Result<Value, ConversionError> {
        match value {
            Value::Undefined => Err(ConversionError::Undefined),
            Value::Null => Err(ConversionError::Nil),
            Value::String(s) if s.is_empty() => Err(ConversionError::Empty),
            other => Ok(other),
        }
    }
}

/// Fails with "must be defined" if the key was absent. `Null` passes.
pub fn require_defined() -> Converter {
    from_fn(|value| match value {
        Value::Undefined => Err(ConversionError::Undefined),
        other => Ok(other),
    })
}

/// Runs `chain` unless the value is `Null`.
pub fn if_not_nil<I>(chain: I) -> Converter
where
    I: IntoIterator<Item = Converter>,
{
    let chain: Vec<Converter> = chain.into_iter().collect();
    from_fn(move |value| match value {
        Value::Null => Ok(Value::Null),
        other => apply_chain(other, &chain),
    })
}

/// Runs `chain` unless the value is `Undefined`.
///
/// Lets a field distinguish "not sent" from "sent as null", as a PATCH
/// request needs to:
///
/// ```rust
/// use mapparse::converter::{if_defined, not_nil};
/// use mapparse::{ConversionError, Value};
///
/// let c = if_defined([not_nil()]);
/// assert_eq!(c.convert(Value::Undefined), Ok(Value::Undefined));
/// assert_eq!(c.convert(Value::Null), Err(ConversionError::Nil));
/// ```
pub fn if_defined<I>(chain: I) -> Converter
where
    I: IntoIterator<Item = Converter>,
{
    let chain: Vec<Converter> = chain.into_iter().collect();
    from_fn(move |value| match value {
        Value::Undefined => Ok(Value::Undefined),
        other => apply_chain(other, &chain),
    })
}

/// Turns empty strings, byte sequences, arrays and maps into `Null`.
/// Everything else is unchanged.
pub fn nilify_empty() -> Converter {
    from_fn(|value| match value.length() {
        Some(0) => Ok(Value::Null),
        _ => Ok(value),
    })
}

/// Replaces `Undefined` with `default`. A present value, including `Null`,
/// is kept.
pub fn default_value(default: impl Into<Value>) -> Converter {
    let default = default.into();
    from_fn(move |value| match value {
        Value::Undefined => Ok(default.clone()),
        other => Ok(other),
    })
}
