//! Length and ordering constraints.

use rust_decimal::Decimal;

use super::{from_fn, to_decimal, Converter};
use crate::error::ConversionError;
use crate::value::Value;

/// Fails with "too short" if the value's length is below `min`.
///
/// Strings are measured in characters, byte sequences in bytes, arrays and
/// maps in entries. Other values fail with "not a string, slice or map".
pub fn min_len(min: usize) -> Converter {
    from_fn(move |value| {
        if value.is_absent() {
            return Ok(value);
        }
        match value.length() {
            None => Err(ConversionError::NotMeasurable),
            Some(n) if n < min => Err(ConversionError::TooShort),
            Some(_) => Ok(value),
        }
    })
}

/// Fails with "too long" if the value's length is above `max`.
///
/// Measures the same way as [`min_len`].
pub fn max_len(max: usize) -> Converter {
    from_fn(move |value| {
        if value.is_absent() {
            return Ok(value);
        }
        match value.length() {
            None => Err(ConversionError::NotMeasurable),
            Some(n) if n > max => Err(ConversionError::TooLong),
            Some(_) => Ok(value),
        }
    })
}

/// Fails with "too large" unless the value is strictly below `bound`.
///
/// The value and bound are compared as decimals, so any numeric value or
/// numeric text works. Values that are not numbers fail with "not a number".
///
/// # Panics
///
/// Panics if `bound` cannot be read as a decimal number.
///
/// # Example
///
/// ```rust
/// use mapparse::converter::less_than;
/// use mapparse::{ConversionError, Value};
///
/// let c = less_than(10);
/// assert_eq!(c.convert(Value::from(9)), Ok(Value::from(9)));
/// assert_eq!(c.convert(Value::from("10")), Err(ConversionError::TooLarge));
/// ```
pub fn less_than(bound: impl Into<Value>) -> Converter {
    compare(bound.into(), |n, bound| n < bound, ConversionError::TooLarge)
}

/// Fails with "too large" unless the value is at most `bound`.
///
/// # Panics
///
/// Panics if `bound` cannot be read as a decimal number.
pub fn less_than_or_equal(bound: impl Into<Value>) -> Converter {
    compare(bound.into(), |n, bound| n <= bound, ConversionError::TooLarge)
}

/// Fails with "too small" unless the value is strictly above `bound`.
///
/// # Panics
///
/// Panics if `bound` cannot be read as a decimal number.
pub fn greater_than(bound: impl Into<Value>) -> Converter {
    compare(bound.into(), |n, bound| n > bound, ConversionError::TooSmall)
}

/// Fails with "too small" unless the value is at least `bound`.
///
/// # Panics
///
/// Panics if `bound` cannot be read as a decimal number.
pub fn greater_than_or_equal(bound: impl Into<Value>) -> Converter {
    compare(bound.into(), |n, bound| n >= bound, ConversionError::TooSmall)
}

fn compare(
    bound: Value,
    accept: fn(&Decimal, &Decimal) -> bool,
    failure: ConversionError,
) -> Converter {
    let bound = match to_decimal(&bound) {
        Ok(bound) => bound,
        Err(_) => panic!("{} is not convertible to a decimal number", bound),
    };

    from_fn(move |value| {
        if value.is_absent() {
            return Ok(value);
        }
        let n = to_decimal(&value).map_err(|_| ConversionError::NotComparable)?;
        if accept(&n, &bound) {
            Ok(value)
        } else {
            Err(failure.clone())
        }
    })
}
