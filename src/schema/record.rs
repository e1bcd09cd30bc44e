//! Parsed records.

use std::fmt;

use stillwater::Validation;

use super::Type;
use crate::error::FieldErrors;
use crate::value::{Map, Value};
use crate::ParseResult;

static UNDEFINED: Value = Value::Undefined;

/// The result of parsing a map with a [`Type`].
///
/// A record keeps the original input, the successfully converted
/// attributes, and the error of every field that failed. A field is never
/// both converted and failed.
///
/// Accessing a name that is not a field of the record's type is a
/// programming error and panics, see [`get`](Record::get).
#[derive(Clone)]
pub struct Record {
    ty: Type,
    original: Map,
    converted: Map,
    errors: FieldErrors,
}

impl Record {
    pub(crate) fn new(ty: Type, original: Map, converted: Map, errors: FieldErrors) -> Self {
        Self {
            ty,
            original,
            converted,
            errors,
        }
    }

    /// Returns the converted value of a field.
    ///
    /// Fields that failed or were absent return [`Value::Undefined`].
    ///
    /// # Panics
    ///
    /// Panics if `name` is not a field of the record's type.
    pub fn get(&self, name: &str) -> &Value {
        self.assert_field(name);
        self.converted.get(name).unwrap_or(&UNDEFINED)
    }

    /// Returns the converted attributes.
    pub fn attrs(&self) -> &Map {
        &self.converted
    }

    pub fn into_attrs(self) -> Map {
        self.converted
    }

    /// Returns the converted values of the named fields. Fields without a
    /// converted value are left out.
    ///
    /// # Panics
    ///
    /// Panics if any name is not a field of the record's type.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mapparse::converter::int32;
    /// use mapparse::{Type, Value};
    /// use serde_json::json;
    ///
    /// let ty = Type::new()
    ///     .field("a", [int32()])
    ///     .field("b", [int32()])
    ///     .field("c", [int32()]);
    /// let input = Value::from(json!({"a": 1, "b": 2, "c": 3})).into_map().unwrap();
    ///
    /// let picked = ty.parse(input).pick(&["a", "b"]);
    /// assert_eq!(picked.len(), 2);
    /// assert_eq!(picked["b"], Value::Int32(2));
    /// ```
    pub fn pick(&self, names: &[&str]) -> Map {
        let mut picked = Map::with_capacity(names.len());
        for name in names {
            self.assert_field(name);
            if let Some(value) = self.converted.get(*name) {
                picked.insert(name.to_string(), value.clone());
            }
        }
        picked
    }

    /// Returns the field errors, or `None` if every field converted.
    pub fn errors(&self) -> Option<&FieldErrors> {
        if self.errors.is_empty() {
            None
        } else {
            Some(&self.errors)
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the input map exactly as it was given to the parser.
    pub fn original(&self) -> &Map {
        &self.original
    }

    pub fn record_type(&self) -> &Type {
        &self.ty
    }

    /// Converts into a `Validation`: the record on success, its field errors
    /// on failure.
    pub fn into_validation(mut self) -> ParseResult {
        if self.errors.is_empty() {
            Validation::Success(self)
        } else {
            Validation::Failure(std::mem::take(&mut self.errors))
        }
    }

    fn assert_field(&self, name: &str) {
        if !self.ty.has_field(name) {
            panic!("{:?} is not a field of type", name);
        }
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("converted", &self.converted)
            .field("errors", &self.errors)
            .finish()
    }
}

/// Records are equal when their converted attributes and errors are equal.
impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.converted == other.converted && self.errors == other.errors
    }
}
