//! Value converters and the built-in converter library.
//!
//! A converter takes a [`Value`] and either returns a (possibly transformed)
//! value or fails with a [`ConversionError`]. A field declares an ordered
//! chain of converters; each one receives the previous one's output and the
//! chain stops at the first failure.
//!
//! Most built-in converters pass `Null` and `Undefined` through untouched so
//! that presence rules stay orthogonal to type rules. Put [`required`] or
//! [`not_nil`] in front of a chain to reject missing values.
//!
//! # Example
//!
//! ```rust
//! use mapparse::converter::{apply_chain, int32, less_than, required};
//! use mapparse::{ConversionError, Value};
//!
//! let chain = [required(), int32(), less_than(100)];
//!
//! assert_eq!(apply_chain(Value::from(" 42 "), &chain), Ok(Value::Int32(42)));
//! assert_eq!(
//!     apply_chain(Value::from("250"), &chain),
//!     Err(ConversionError::TooLarge)
//! );
//! assert_eq!(apply_chain(Value::Undefined, &chain), Err(ConversionError::Undefined));
//! ```
//!
//! Custom converters are plain closures:
//!
//! ```rust
//! use mapparse::converter::from_fn;
//! use mapparse::{ConversionError, Value};
//!
//! let even = from_fn(|value: Value| match value.as_i64() {
//!     Some(n) if n % 2 != 0 => Err(ConversionError::custom("must be even")),
//!     _ => Ok(value),
//! });
//! ```

mod bounds;
mod numeric;
mod presence;
mod scalar;
mod sequence;
mod string;

use std::sync::Arc;

use crate::error::ConversionError;
use crate::value::Value;

pub use bounds::{
    greater_than, greater_than_or_equal, less_than, less_than_or_equal, max_len, min_len,
};
pub use numeric::{decimal, float32, float64, int32, int64};
pub use presence::{
    default_value, if_defined, if_not_nil, nilify_empty, not_nil, require_defined, required,
};
pub use scalar::{boolean, time, uuid, DATE, RFC3339};
pub use sequence::{records, slice};
pub use string::{
    allow_strings, deny_strings, matches, multi_line_string, normalize_multi_line,
    normalize_single_line, single_line_string, string,
};

pub(crate) use numeric::to_decimal;

/// A step in a field's conversion chain.
///
/// Implementors must be `Send + Sync`; a type is shared between every parse
/// that uses it, including parallel ones.
pub trait ValueConverter: Send + Sync {
    /// Converts a value, or explains why it cannot be converted.
    fn convert(&self, value: Value) -> Result<Value, ConversionError>;
}

/// A shared, type-erased converter.
pub type Converter = Arc<dyn ValueConverter>;

impl<F> ValueConverter for F
where
    F: Fn(Value) -> Result<Value, ConversionError> + Send + Sync,
{
    fn convert(&self, value: Value) -> Result<Value, ConversionError> {
        self(value)
    }
}

/// Wraps a closure as a [`Converter`].
pub fn from_fn<F>(f: F) -> Converter
where
    F: Fn(Value) -> Result<Value, ConversionError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Runs `value` through `chain` in order, stopping at the first error.
///
/// An empty chain returns the value unchanged.
pub fn apply_chain(value: Value, chain: &[Converter]) -> Result<Value, ConversionError> {
    chain.iter().try_fold(value, |value, converter| converter.convert(value))
}
