//! Record types: an ordered set of fields.

use std::sync::Arc;

use indexmap::IndexMap;
use rayon::prelude::*;

use super::{Field, Record};
use crate::converter::{Converter, ValueConverter};
use crate::error::{ConversionError, FieldErrors};
use crate::value::{Map, Value};

/// A record type: named fields, each with a converter chain.
///
/// A type is built once and then shared. Cloning is cheap (the fields sit
/// behind an `Arc`), and builder calls on a clone never affect the original.
///
/// A `Type` is itself a converter, so one type can be a field of another:
///
/// ```rust
/// use mapparse::converter::{int32, required, single_line_string};
/// use mapparse::{Type, Value};
/// use serde_json::json;
///
/// let address = Type::new()
///     .field("city", [required(), single_line_string()]);
///
/// let person = Type::new()
///     .field("name", [required(), single_line_string()])
///     .field("age", [int32()])
///     .field("address", [required(), address.clone().into_converter()]);
///
/// let input = Value::from(json!({
///     "name": " Ann ",
///     "age": "41",
///     "address": {"city": "Oslo"}
/// }))
/// .into_map()
/// .unwrap();
///
/// let record = person.parse(input);
/// assert!(record.is_valid());
/// assert_eq!(record.get("age"), &Value::Int32(41));
/// assert_eq!(
///     record.get("address").as_record().unwrap().get("city"),
///     &Value::from("Oslo")
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Type {
    fields: Arc<IndexMap<String, Field>>,
}

impl Type {
    /// Creates a type with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a field with the given converter chain.
    ///
    /// # Panics
    ///
    /// Panics if a field with the same name is already declared.
    pub fn field<I>(mut self, name: impl Into<String>, converters: I) -> Self
    where
        I: IntoIterator<Item = Converter>,
    {
        let name = name.into();
        let fields = Arc::make_mut(&mut self.fields);
        if fields.contains_key(&name) {
            panic!("field {:?} is already declared", name);
        }
        fields.insert(name.clone(), Field::new(name, converters));
        self
    }

    /// Returns the declared fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Wraps the type as a [`Converter`] for use in another type's field.
    pub fn into_converter(self) -> Converter {
        Arc::new(self)
    }

    /// Parses `input` into a record.
    ///
    /// Every declared field is converted, in declaration order, even after
    /// another field has failed. Keys of `input` that are not declared
    /// fields are ignored. A declared key missing from `input` enters its
    /// chain as [`Value::Undefined`]; if the chain leaves it undefined the
    /// field is omitted from the record's attributes.
    pub fn parse(&self, input: Map) -> Record {
        let mut converted = Map::with_capacity(self.fields.len());
        let mut errors = FieldErrors::new();

        for (name, field) in self.fields.iter() {
            let value = input.get(name).cloned().unwrap_or(Value::Undefined);
            match field.convert(value) {
                Ok(Value::Undefined) => {}
                Ok(value) => {
                    converted.insert(name.clone(), value);
                }
                Err(error) => {
                    tracing::trace!(field = %name, error = %error, "field conversion failed");
                    errors.insert(name.clone(), error);
                }
            }
        }

        if !errors.is_empty() {
            tracing::debug!(
                fields = self.fields.len(),
                errors = errors.len(),
                "parsed record with errors"
            );
        }

        Record::new(self.clone(), input, converted, errors)
    }

    /// Whether `record` came from this type or one of its unmodified clones.
    fn parsed(&self, record: &Record) -> bool {
        Arc::ptr_eq(&self.fields, &record.record_type().fields)
    }

    /// Parses many inputs in parallel. The result is in input order and
    /// equal to parsing each input in turn.
    pub fn parse_all(&self, inputs: &[Map]) -> Vec<Record> {
        inputs
            .par_iter()
            .map(|input| self.parse(input.clone()))
            .collect()
    }
}

/// Maps become records, failing with the record's field errors. A record
/// parsed by this type is kept as is; a record of any other type is parsed
/// again from its original input. `Null` and `Undefined` pass through.
impl ValueConverter for Type {
    fn convert(&self, value: Value) -> Result<Value, ConversionError> {
        match value {
            absent @ (Value::Null | Value::Undefined) => Ok(absent),
            Value::Record(record) if self.parsed(&record) => checked(*record),
            Value::Record(record) => checked(self.parse(record.original().clone())),
            Value::Map(input) => checked(self.parse(input)),
            _ => Err(ConversionError::NotARecord),
        }
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Type>();
    assert_sync::<Type>();
};

fn checked(record: Record) -> Result<Value, ConversionError> {
    match record.errors() {
        Some(errors) => Err(ConversionError::Record(errors.clone())),
        None => Ok(Value::Record(Box::new(record))),
    }
}
