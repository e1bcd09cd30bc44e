//! Per-field errors of a parsed record.

use std::collections::btree_map::{self, BTreeMap};
use std::fmt::{self, Display};

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::ConversionError;
use crate::path::{FieldPath, PathSegment};

/// The errors of a record, keyed by field name.
///
/// Each field maps to the error raised by the first converter in its chain
/// that failed. Entries are kept sorted by field name so the text and JSON
/// forms do not depend on parsing order.
///
/// The text form joins `"<field> <message>"` pairs with `", "`:
///
/// ```rust
/// use mapparse::converter::{int32, required};
/// use mapparse::{Map, Type, Value};
///
/// let ty = Type::new()
///     .field("b", [required()])
///     .field("a", [int32()]);
///
/// let mut input = Map::new();
/// input.insert("a".to_string(), Value::from("abc"));
///
/// let record = ty.parse(input);
/// let errors = record.errors().unwrap();
/// assert_eq!(errors.to_string(), "a not a valid number, b must be defined");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldErrors(BTreeMap<String, ConversionError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the error for a field, replacing any earlier one.
    pub fn insert(&mut self, field: impl Into<String>, error: ConversionError) {
        self.0.insert(field.into(), error);
    }

    pub fn get(&self, field: &str) -> Option<&ConversionError> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the failing field names in sorted order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, ConversionError> {
        self.0.iter()
    }

    /// Flattens nested record and element errors into leaf errors, each with
    /// the full path to the value that failed.
    ///
    /// ```rust
    /// use mapparse::{ConversionError, ElementError, ElementErrors, FieldErrors};
    ///
    /// let mut line = FieldErrors::new();
    /// line.insert("quantity", ConversionError::TooSmall);
    ///
    /// let mut order = FieldErrors::new();
    /// order.insert(
    ///     "items",
    ///     ConversionError::Elements(ElementErrors::single(ElementError::new(
    ///         1,
    ///         ConversionError::Record(line),
    ///     ))),
    /// );
    ///
    /// let leaves = order.leaves();
    /// assert_eq!(leaves.len(), 1);
    /// assert_eq!(leaves[0].0.to_string(), "items[1].quantity");
    /// assert_eq!(leaves[0].1, &ConversionError::TooSmall);
    /// ```
    pub fn leaves(&self) -> Vec<(FieldPath, &ConversionError)> {
        let mut leaves = Leaves::default();
        leaves.visit_fields(self);
        leaves.out
    }
}

/// Walks nested errors depth first, keeping the current path as a stack.
#[derive(Default)]
struct Leaves<'a> {
    stack: Vec<PathSegment>,
    out: Vec<(FieldPath, &'a ConversionError)>,
}

impl<'a> Leaves<'a> {
    fn visit_fields(&mut self, errors: &'a FieldErrors) {
        for (field, error) in errors.iter() {
            self.stack.push(PathSegment::Field(field.clone()));
            self.visit(error);
            self.stack.pop();
        }
    }

    fn visit(&mut self, error: &'a ConversionError) {
        match error {
            ConversionError::Record(nested) => self.visit_fields(nested),
            ConversionError::Elements(elements) => {
                for element in elements.iter() {
                    self.stack.push(PathSegment::Index(element.index));
                    self.visit(&element.error);
                    self.stack.pop();
                }
            }
            leaf => self
                .out
                .push((FieldPath::from_segments(&self.stack), leaf)),
        }
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, error)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} {}", field, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, error) in &self.0 {
            map.serialize_entry(field, error)?;
        }
        map.end()
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = (&'a String, &'a ConversionError);
    type IntoIter = btree_map::Iter<'a, String, ConversionError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, ConversionError)> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = (String, ConversionError)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<FieldErrors>();
    assert_sync::<FieldErrors>();
};
