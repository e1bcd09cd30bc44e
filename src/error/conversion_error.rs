//! Errors raised by a single converter.
//!
//! A [`ConversionError`] is what a converter chain reports for one field.
//! Composite converters nest errors: a sequence reports [`ElementErrors`]
//! and a nested record reports the [`FieldErrors`] of its own fields.

use std::fmt::{self, Display};

use serde::ser::{Serialize, SerializeMap, Serializer};
use stillwater::prelude::*;

use super::FieldErrors;

/// The reason a converter rejected a value.
///
/// The `Display` text of each variant is the message surfaced to end users,
/// and [`code`](ConversionError::code) gives a stable machine-readable form.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    #[error("not a valid number")]
    NotANumber,

    /// The value is above a numeric limit (target width or comparator bound).
    #[error("too large")]
    TooLarge,

    /// The value is below a numeric limit (target width or comparator bound).
    #[error("too small")]
    TooSmall,

    #[error("not a valid boolean")]
    NotABoolean,

    #[error("not a valid time")]
    NotATime,

    #[error("not a valid UUID")]
    NotAUuid,

    #[error("not a string")]
    NotAString,

    #[error("must be defined")]
    Undefined,

    #[error("cannot be nil")]
    Nil,

    #[error("cannot be empty")]
    Empty,

    #[error("too short")]
    TooShort,

    #[error("too long")]
    TooLong,

    /// The value has no length (not a string, byte sequence, array or map).
    #[error("not a string, slice or map")]
    NotMeasurable,

    #[error("not allowed value")]
    NotAllowed,

    #[error("does not match pattern {0}")]
    PatternMismatch(String),

    /// A comparator received a value it could not read as a number.
    #[error("not a number")]
    NotComparable,

    #[error("cannot convert to slice")]
    NotASequence,

    #[error("cannot convert to record")]
    NotARecord,

    /// One or more sequence elements failed.
    #[error("{0}")]
    Elements(ElementErrors),

    /// A nested record had invalid fields.
    #[error("{0}")]
    Record(FieldErrors),

    /// An error raised by a user-supplied converter.
    #[error("{0}")]
    Custom(String),
}

impl ConversionError {
    /// Creates an error with a caller-chosen message.
    pub fn custom(message: impl Into<String>) -> Self {
        ConversionError::Custom(message.into())
    }

    /// Returns a machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            ConversionError::NotANumber => "not_a_number",
            ConversionError::TooLarge => "too_large",
            ConversionError::TooSmall => "too_small",
            ConversionError::NotABoolean => "not_a_boolean",
            ConversionError::NotATime => "not_a_time",
            ConversionError::NotAUuid => "not_a_uuid",
            ConversionError::NotAString => "not_a_string",
            ConversionError::Undefined => "undefined",
            ConversionError::Nil => "nil",
            ConversionError::Empty => "empty",
            ConversionError::TooShort => "too_short",
            ConversionError::TooLong => "too_long",
            ConversionError::NotMeasurable => "not_measurable",
            ConversionError::NotAllowed => "not_allowed",
            ConversionError::PatternMismatch(_) => "pattern_mismatch",
            ConversionError::NotComparable => "not_comparable",
            ConversionError::NotASequence => "not_a_sequence",
            ConversionError::NotARecord => "not_a_record",
            ConversionError::Elements(_) => "invalid_elements",
            ConversionError::Record(_) => "invalid_record",
            ConversionError::Custom(_) => "custom",
        }
    }

    /// Returns true for errors about a value falling outside a numeric range.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, ConversionError::TooLarge | ConversionError::TooSmall)
    }
}

/// Nested errors serialize as objects, leaf errors as their message.
impl Serialize for ConversionError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ConversionError::Elements(errors) => errors.serialize(serializer),
            ConversionError::Record(errors) => errors.serialize(serializer),
            other => serializer.collect_str(other),
        }
    }
}

/// The failure of one element of a sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementError {
    /// Zero-based position of the element in the input sequence.
    pub index: usize,
    /// What went wrong with the element.
    pub error: Box<ConversionError>,
}

impl ElementError {
    pub fn new(index: usize, error: ConversionError) -> Self {
        Self {
            index,
            error: Box::new(error),
        }
    }
}

impl Display for ElementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Element {}: {}", self.index, self.error)
    }
}

/// Every failing element of a sequence, in index order.
///
/// Wraps a `NonEmptyVec` so a sequence failure always names at least one
/// element. Implements `Semigroup`, so failures found by separate passes
/// can be merged:
///
/// ```rust
/// use mapparse::{ConversionError, ElementError, ElementErrors};
/// use stillwater::prelude::*;
///
/// let first = ElementErrors::single(ElementError::new(0, ConversionError::NotANumber));
/// let second = ElementErrors::single(ElementError::new(2, ConversionError::TooLarge));
///
/// let all = first.combine(second);
/// assert_eq!(all.indices(), vec![0, 2]);
/// assert_eq!(all.to_string(), "Element 0: not a valid number, Element 2: too large");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ElementErrors(NonEmptyVec<ElementError>);

impl ElementErrors {
    pub fn single(error: ElementError) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    /// Builds the collection from a list of element errors, or returns
    /// `None` when the list is empty.
    pub fn from_vec(errors: Vec<ElementError>) -> Option<Self> {
        NonEmptyVec::from_vec(errors).map(Self)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; the collection holds at least one error.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &ElementError> {
        self.0.iter()
    }

    pub fn first(&self) -> &ElementError {
        self.0.head()
    }

    /// Returns the error for the element at `index`, if that element failed.
    pub fn get(&self, index: usize) -> Option<&ConversionError> {
        self.iter()
            .find(|e| e.index == index)
            .map(|e| e.error.as_ref())
    }

    /// Returns the positions of the failing elements.
    pub fn indices(&self) -> Vec<usize> {
        self.iter().map(|e| e.index).collect()
    }

    pub fn into_vec(self) -> Vec<ElementError> {
        self.0.into_vec()
    }
}

impl Semigroup for ElementErrors {
    fn combine(self, other: Self) -> Self {
        ElementErrors(self.0.combine(other.0))
    }
}

impl Display for ElementErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ElementErrors {}

impl<'a> IntoIterator for &'a ElementErrors {
    type Item = &'a ElementError;
    type IntoIter = Box<dyn Iterator<Item = &'a ElementError> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.0.iter())
    }
}

/// Serializes as an object keyed by the element index.
impl Serialize for ElementErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for error in self.iter() {
            map.serialize_entry(&error.index.to_string(), error.error.as_ref())?;
        }
        map.end()
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ConversionError>();
    assert_sync::<ConversionError>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(ConversionError::NotANumber.to_string(), "not a valid number");
        assert_eq!(ConversionError::Nil.to_string(), "cannot be nil");
        assert_eq!(
            ConversionError::NotMeasurable.to_string(),
            "not a string, slice or map"
        );
        assert_eq!(ConversionError::custom("bad").to_string(), "bad");
    }

    #[test]
    fn test_codes() {
        assert_eq!(ConversionError::TooLarge.code(), "too_large");
        assert_eq!(ConversionError::custom("x").code(), "custom");
        assert!(ConversionError::TooSmall.is_out_of_range());
        assert!(!ConversionError::NotANumber.is_out_of_range());
    }

    #[test]
    fn test_element_errors_from_empty_vec() {
        assert!(ElementErrors::from_vec(Vec::new()).is_none());
    }

    #[test]
    fn test_element_errors_lookup() {
        let errors = ElementErrors::from_vec(vec![
            ElementError::new(1, ConversionError::NotANumber),
            ElementError::new(3, ConversionError::Nil),
        ])
        .unwrap();

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.first().index, 1);
        assert_eq!(errors.get(3), Some(&ConversionError::Nil));
        assert_eq!(errors.get(2), None);
    }

    #[test]
    fn test_element_errors_serialize_by_index() {
        let errors = ConversionError::Elements(ElementErrors::single(ElementError::new(
            4,
            ConversionError::TooLong,
        )));
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            serde_json::json!({"4": "too long"})
        );
    }

    #[test]
    fn test_semigroup_associativity() {
        let a = ElementErrors::single(ElementError::new(0, ConversionError::Nil));
        let b = ElementErrors::single(ElementError::new(1, ConversionError::Empty));
        let c = ElementErrors::single(ElementError::new(2, ConversionError::TooLong));

        let left = a.clone().combine(b.clone()).combine(c.clone());
        let right = a.combine(b.combine(c));
        assert_eq!(left, right);
    }
}
