//! Sequence converters.

use super::{from_fn, Converter, ValueConverter};
use crate::error::{ConversionError, ElementError, ElementErrors};
use crate::schema::Type;
use crate::value::Value;

/// Converts every element of an array with `element`.
///
/// All elements are attempted. If any fail, the result is a single
/// [`ConversionError::Elements`] listing each failing index. Values that
/// are not arrays fail with "cannot convert to slice".
///
/// # Example
///
/// ```rust
/// use mapparse::converter::{int32, slice};
/// use mapparse::{ConversionError, Value};
///
/// let c = slice(int32());
/// let input = Value::from(vec![Value::from("1"), Value::from("x"), Value::from("3")]);
///
/// match c.convert(input) {
///     Err(ConversionError::Elements(errors)) => assert_eq!(errors.indices(), vec![1]),
///     other => panic!("unexpected {:?}", other),
/// }
/// ```
pub fn slice(element: Converter) -> Converter {
    from_fn(move |value| match value {
        absent @ (Value::Null | Value::Undefined) => Ok(absent),
        Value::Array(items) => convert_elements(items, element.as_ref()),
        _ => Err(ConversionError::NotASequence),
    })
}

/// Parses every element of an array as a record of type `ty`.
///
/// Each element must be a map (or an already parsed record). Elements that
/// are not fail with "cannot convert to record"; elements with invalid
/// fields fail with the nested field errors.
pub fn records(ty: Type) -> Converter {
    let element = from_fn(move |value| match value {
        Value::Map(_) | Value::Record(_) => ty.convert(value),
        _ => Err(ConversionError::NotARecord),
    });
    slice(element)
}

fn convert_elements(
    items: Vec<Value>,
    element: &dyn ValueConverter,
) -> Result<Value, ConversionError> {
    let mut converted = Vec::with_capacity(items.len());
    let mut errors = Vec::new();

    for (index, item) in items.into_iter().enumerate() {
        match element.convert(item) {
            Ok(value) => converted.push(value),
            Err(error) => errors.push(ElementError::new(index, error)),
        }
    }

    match ElementErrors::from_vec(errors) {
        Some(errors) => Err(ConversionError::Elements(errors)),
        None => Ok(Value::Array(converted)),
    }
}
