//! Numeric converters.
//!
//! Every numeric converter accepts numbers of any width and numeric text.
//! Text is trimmed first, and blank text counts as `Null`. Values that do
//! not fit the target width fail with [`ConversionError::TooLarge`] or
//! [`ConversionError::TooSmall`]; anything else that cannot be read as a
//! number fails with [`ConversionError::NotANumber`].

use std::num::IntErrorKind;
use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use super::{Converter, ValueConverter};
use crate::error::ConversionError;
use crate::value::Value;

/// The finest scale (digits after the point) a `Decimal` holds.
const MAX_SCALE: u32 = 28;

/// 2^63, the first float above `i64::MAX`.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Trims text and turns blank text into `Null`. Other values are unchanged.
pub(crate) fn normalize_for_parsing(value: Value) -> Value {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Value::Null
            } else if trimmed.len() == s.len() {
                Value::String(s)
            } else {
                Value::String(trimmed.to_string())
            }
        }
        other => other,
    }
}

/// Converts to a 64-bit signed integer (`Value::Int`).
pub fn int64() -> Converter {
    Arc::new(Int64Converter)
}

/// Converts to a 32-bit signed integer (`Value::Int32`).
pub fn int32() -> Converter {
    Arc::new(Int32Converter)
}

/// Converts to a 64-bit float (`Value::Float`).
pub fn float64() -> Converter {
    Arc::new(Float64Converter)
}

/// Converts to a 32-bit float (`Value::Float32`).
pub fn float32() -> Converter {
    Arc::new(Float32Converter)
}

/// Converts to an arbitrary-precision decimal (`Value::Decimal`).
///
/// Text may use plain (`"12.50"`) or scientific (`"1.25e1"`) notation.
pub fn decimal() -> Converter {
    Arc::new(DecimalConverter)
}

#[derive(Debug, Clone, Copy)]
struct Int64Converter;

impl ValueConverter for Int64Converter {
    fn convert(&self, value: Value) -> Result<Value, ConversionError> {
        match normalize_for_parsing(value) {
            absent @ (Value::Null | Value::Undefined) => Ok(absent),
            value => to_i64(&value).map(Value::Int),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Int32Converter;

impl ValueConverter for Int32Converter {
    fn convert(&self, value: Value) -> Result<Value, ConversionError> {
        match normalize_for_parsing(value) {
            absent @ (Value::Null | Value::Undefined) => Ok(absent),
            value => to_i32(&value).map(Value::Int32),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Float64Converter;

impl ValueConverter for Float64Converter {
    fn convert(&self, value: Value) -> Result<Value, ConversionError> {
        match normalize_for_parsing(value) {
            absent @ (Value::Null | Value::Undefined) => Ok(absent),
            value => to_f64(&value).map(Value::Float),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Float32Converter;

impl ValueConverter for Float32Converter {
    fn convert(&self, value: Value) -> Result<Value, ConversionError> {
        match normalize_for_parsing(value) {
            absent @ (Value::Null | Value::Undefined) => Ok(absent),
            value => to_f32(&value).map(Value::Float32),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct DecimalConverter;

impl ValueConverter for DecimalConverter {
    fn convert(&self, value: Value) -> Result<Value, ConversionError> {
        match normalize_for_parsing(value) {
            absent @ (Value::Null | Value::Undefined) => Ok(absent),
            value => to_decimal(&value).map(Value::Decimal),
        }
    }
}

fn to_i64(value: &Value) -> Result<i64, ConversionError> {
    match value {
        Value::Int(n) => Ok(*n),
        Value::Int32(n) => Ok(i64::from(*n)),
        Value::UInt(n) => i64::try_from(*n).map_err(|_| ConversionError::TooLarge),
        Value::Float(n) => float_to_i64(*n),
        Value::Float32(n) => float_to_i64(f64::from(*n)),
        Value::Decimal(d) => decimal_to_i64(d),
        Value::String(s) => parse_i64(s),
        _ => Err(ConversionError::NotANumber),
    }
}

fn to_i32(value: &Value) -> Result<i32, ConversionError> {
    let n = to_i64(value)?;
    i32::try_from(n).map_err(|_| {
        if n < 0 {
            ConversionError::TooSmall
        } else {
            ConversionError::TooLarge
        }
    })
}

fn float_to_i64(n: f64) -> Result<i64, ConversionError> {
    if n.is_nan() {
        Err(ConversionError::NotANumber)
    } else if n >= I64_LIMIT {
        Err(ConversionError::TooLarge)
    } else if n < -I64_LIMIT {
        Err(ConversionError::TooSmall)
    } else if n.fract() != 0.0 {
        Err(ConversionError::NotANumber)
    } else {
        Ok(n as i64)
    }
}

fn decimal_to_i64(d: &Decimal) -> Result<i64, ConversionError> {
    if !d.fract().is_zero() {
        return Err(ConversionError::NotANumber);
    }
    d.to_i64().ok_or(if d.is_sign_negative() {
        ConversionError::TooSmall
    } else {
        ConversionError::TooLarge
    })
}

fn parse_i64(s: &str) -> Result<i64, ConversionError> {
    s.trim().parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => ConversionError::TooLarge,
        IntErrorKind::NegOverflow => ConversionError::TooSmall,
        _ => ConversionError::NotANumber,
    })
}

fn to_f64(value: &Value) -> Result<f64, ConversionError> {
    match value {
        Value::Int(n) => Ok(*n as f64),
        Value::UInt(n) => Ok(*n as f64),
        Value::Int32(n) => Ok(f64::from(*n)),
        Value::Float(n) => Ok(*n),
        Value::Float32(n) => Ok(f64::from(*n)),
        Value::Decimal(d) => d.to_f64().ok_or(ConversionError::NotANumber),
        Value::String(s) => parse_f64(s),
        _ => Err(ConversionError::NotANumber),
    }
}

/// Parses a float, reporting literals beyond the `f64` range as out of
/// range instead of silently rounding them to infinity.
fn parse_f64(s: &str) -> Result<f64, ConversionError> {
    let text = s.trim();
    let n: f64 = text.parse().map_err(|_| ConversionError::NotANumber)?;
    if n.is_infinite() && !text.to_ascii_lowercase().contains("inf") {
        return Err(if n > 0.0 {
            ConversionError::TooLarge
        } else {
            ConversionError::TooSmall
        });
    }
    Ok(n)
}

fn to_f32(value: &Value) -> Result<f32, ConversionError> {
    if let Value::Float32(n) = value {
        return Ok(*n);
    }
    let n = to_f64(value)?;
    let max = f64::from(f32::MAX);
    if n < -max && n.is_finite() {
        Err(ConversionError::TooSmall)
    } else if n > max && n.is_finite() {
        Err(ConversionError::TooLarge)
    } else {
        Ok(n as f32)
    }
}

/// Reads any numeric value as a decimal. Shared with the ordering
/// comparators.
pub(crate) fn to_decimal(value: &Value) -> Result<Decimal, ConversionError> {
    match value {
        Value::Decimal(d) => Ok(*d),
        Value::Int(n) => Ok(Decimal::from(*n)),
        Value::UInt(n) => Ok(Decimal::from(*n)),
        Value::Int32(n) => Ok(Decimal::from(*n)),
        Value::Float(n) => float_to_decimal(*n),
        Value::Float32(n) => float_to_decimal(f64::from(*n)),
        Value::String(s) => parse_decimal(s),
        _ => Err(ConversionError::NotANumber),
    }
}

fn float_to_decimal(n: f64) -> Result<Decimal, ConversionError> {
    if n.is_nan() {
        return Err(ConversionError::NotANumber);
    }
    Decimal::from_f64(n).ok_or(if n < 0.0 {
        ConversionError::TooSmall
    } else {
        ConversionError::TooLarge
    })
}

fn parse_decimal(s: &str) -> Result<Decimal, ConversionError> {
    let text = s.trim();
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .or_else(|_| match split_literal(text) {
            Some((mantissa, exponent)) if exponent < 0 => round_to_max_scale(mantissa, exponent),
            // Well formed but unrepresentable: too many digits or too large an exponent.
            Some((mantissa, _)) => Err(out_of_range(mantissa)),
            None => Err(ConversionError::NotANumber),
        })
}

/// Splits a well-formed literal `[+-]digits[.digits][e[+-]digits]` into its
/// signed mantissa and exponent. Exponents too long for an `i64` saturate.
fn split_literal(text: &str) -> Option<(&str, i64)> {
    let (mantissa, exponent) = match text.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, Some(exponent)),
        None => (text, None),
    };

    let unsigned = mantissa.strip_prefix(['+', '-']).unwrap_or(mantissa);
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let digits_ok = !(whole.is_empty() && fraction.is_empty())
        && whole.chars().all(|c| c.is_ascii_digit())
        && fraction.chars().all(|c| c.is_ascii_digit());
    if !digits_ok {
        return None;
    }

    let Some(exponent) = exponent else {
        return Some((mantissa, 0));
    };
    let (negative, digits) = match exponent.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, exponent.strip_prefix('+').unwrap_or(exponent)),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some((mantissa, if negative { -magnitude } else { magnitude }))
}

fn out_of_range(mantissa: &str) -> ConversionError {
    if mantissa.starts_with('-') {
        ConversionError::TooSmall
    } else {
        ConversionError::TooLarge
    }
}

/// Rounds `mantissa * 10^exponent` half away from zero to the finest scale a
/// `Decimal` holds. Values below that resolution become zero.
fn round_to_max_scale(mantissa: &str, exponent: i64) -> Result<Decimal, ConversionError> {
    let mantissa = Decimal::from_str(mantissa).map_err(|_| out_of_range(mantissa))?;
    let scale = i64::from(mantissa.scale()).saturating_sub(exponent);
    let excess = scale - i64::from(MAX_SCALE);
    if excess <= 0 {
        let mut exact = mantissa;
        exact
            .set_scale(scale as u32)
            .map_err(|_| ConversionError::NotANumber)?;
        return Ok(exact);
    }
    // A mantissa has at most 29 digits.
    if excess > 29 {
        return Ok(Decimal::ZERO);
    }

    let raw = mantissa.mantissa();
    let divisor = 10i128.pow(excess as u32);
    let mut rounded = raw / divisor;
    if (raw % divisor).abs() * 2 >= divisor {
        rounded += raw.signum();
    }
    Decimal::try_from_i128_with_scale(rounded, MAX_SCALE)
        .map(|d| d.normalize())
        .map_err(|_| ConversionError::NotANumber)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(converter: &Converter, value: impl Into<Value>) -> Result<Value, ConversionError> {
        converter.convert(value.into())
    }

    #[test]
    fn test_normalize_for_parsing() {
        assert_eq!(normalize_for_parsing(Value::from("  ")), Value::Null);
        assert_eq!(normalize_for_parsing(Value::from(" 7 ")), Value::from("7"));
        assert_eq!(normalize_for_parsing(Value::from(7)), Value::from(7));
    }

    #[test]
    fn test_int64_from_text() {
        let c = int64();
        assert_eq!(convert(&c, " 42 "), Ok(Value::Int(42)));
        assert_eq!(convert(&c, "-9223372036854775808"), Ok(Value::Int(i64::MIN)));
        assert_eq!(convert(&c, "9223372036854775808"), Err(ConversionError::TooLarge));
        assert_eq!(convert(&c, "-9223372036854775809"), Err(ConversionError::TooSmall));
        assert_eq!(convert(&c, "1.5"), Err(ConversionError::NotANumber));
        assert_eq!(convert(&c, "abc"), Err(ConversionError::NotANumber));
    }

    #[test]
    fn test_int64_blank_and_absent() {
        let c = int64();
        assert_eq!(convert(&c, ""), Ok(Value::Null));
        assert_eq!(convert(&c, "   "), Ok(Value::Null));
        assert_eq!(c.convert(Value::Null), Ok(Value::Null));
        assert_eq!(c.convert(Value::Undefined), Ok(Value::Undefined));
    }

    #[test]
    fn test_int64_from_floats() {
        let c = int64();
        assert_eq!(convert(&c, 3.0), Ok(Value::Int(3)));
        assert_eq!(convert(&c, 3.5), Err(ConversionError::NotANumber));
        assert_eq!(convert(&c, f64::NAN), Err(ConversionError::NotANumber));
        assert_eq!(convert(&c, 1e19), Err(ConversionError::TooLarge));
        assert_eq!(convert(&c, -1e19), Err(ConversionError::TooSmall));
        assert_eq!(convert(&c, -9_223_372_036_854_775_808.0), Ok(Value::Int(i64::MIN)));
    }

    #[test]
    fn test_int64_from_unsigned_and_decimal() {
        let c = int64();
        assert_eq!(convert(&c, u64::MAX), Err(ConversionError::TooLarge));
        assert_eq!(convert(&c, 12u64), Ok(Value::Int(12)));
        assert_eq!(convert(&c, Decimal::new(1200, 2)), Ok(Value::Int(12)));
        assert_eq!(convert(&c, Decimal::new(1250, 2)), Err(ConversionError::NotANumber));
        assert_eq!(convert(&c, true), Err(ConversionError::NotANumber));
    }

    #[test]
    fn test_int32_range() {
        let c = int32();
        assert_eq!(convert(&c, "2147483647"), Ok(Value::Int32(i32::MAX)));
        assert_eq!(convert(&c, "2147483648"), Err(ConversionError::TooLarge));
        assert_eq!(convert(&c, "-2147483649"), Err(ConversionError::TooSmall));
        assert_eq!(convert(&c, 5i64), Ok(Value::Int32(5)));
    }

    #[test]
    fn test_float64() {
        let c = float64();
        assert_eq!(convert(&c, "1.25"), Ok(Value::Float(1.25)));
        assert_eq!(convert(&c, 2), Ok(Value::Float(2.0)));
        assert_eq!(convert(&c, "1e400"), Err(ConversionError::TooLarge));
        assert_eq!(convert(&c, "-1e400"), Err(ConversionError::TooSmall));
        assert_eq!(convert(&c, "inf"), Ok(Value::Float(f64::INFINITY)));
        assert_eq!(convert(&c, "x1"), Err(ConversionError::NotANumber));
    }

    #[test]
    fn test_float32() {
        let c = float32();
        assert_eq!(convert(&c, "1.5"), Ok(Value::Float32(1.5)));
        assert_eq!(convert(&c, 1e39), Err(ConversionError::TooLarge));
        assert_eq!(convert(&c, "-1e39"), Err(ConversionError::TooSmall));
        assert_eq!(convert(&c, 2.5f32), Ok(Value::Float32(2.5)));
    }

    #[test]
    fn test_decimal() {
        let c = decimal();
        assert_eq!(convert(&c, "12.50"), Ok(Value::Decimal(Decimal::new(1250, 2))));
        assert_eq!(convert(&c, 7), Ok(Value::Decimal(Decimal::from(7))));
        assert_eq!(convert(&c, "1.25e1"), Ok(Value::Decimal(Decimal::new(125, 1))));
        assert_eq!(convert(&c, "ten"), Err(ConversionError::NotANumber));
        assert_eq!(
            convert(&c, "1000000000000000000000000000000000"),
            Err(ConversionError::TooLarge)
        );
        assert_eq!(
            convert(&c, "-1000000000000000000000000000000000"),
            Err(ConversionError::TooSmall)
        );
    }

    #[test]
    fn test_split_literal() {
        assert_eq!(split_literal("123"), Some(("123", 0)));
        assert_eq!(split_literal("-1.5e40"), Some(("-1.5", 40)));
        assert_eq!(split_literal(".5E+2"), Some((".5", 2)));
        assert_eq!(split_literal("1e-40"), Some(("1", -40)));
        assert_eq!(split_literal("1e-99999999999999999999"), Some(("1", -i64::MAX)));
        assert_eq!(split_literal("."), None);
        assert_eq!(split_literal("1x"), None);
        assert_eq!(split_literal("1e"), None);
        assert_eq!(split_literal("1e--2"), None);
    }

    #[test]
    fn test_decimal_tiny_literals_round() {
        let c = decimal();
        assert_eq!(convert(&c, "1e-40"), Ok(Value::Decimal(Decimal::ZERO)));
        assert_eq!(convert(&c, "-1e-99999"), Ok(Value::Decimal(Decimal::ZERO)));
        assert_eq!(convert(&c, "123e-30"), Ok(Value::Decimal(Decimal::new(1, 28))));
        assert_eq!(convert(&c, "-25e-29"), Ok(Value::Decimal(Decimal::new(-3, 28))));
        assert_eq!(convert(&c, "1e-x"), Err(ConversionError::NotANumber));
    }

    #[test]
    fn test_decimal_huge_literals_are_out_of_range() {
        let c = decimal();
        assert_eq!(convert(&c, "1e40"), Err(ConversionError::TooLarge));
        assert_eq!(convert(&c, "-1e40"), Err(ConversionError::TooSmall));
    }
}
