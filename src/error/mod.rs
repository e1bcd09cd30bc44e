//! Error types for conversion failures.
//!
//! Converters fail with a [`ConversionError`]. Parsing a record collects
//! one error per failing field into [`FieldErrors`]; sequences collect one
//! error per failing element into [`ElementErrors`].

mod conversion_error;
mod field_errors;

pub use conversion_error::{ConversionError, ElementError, ElementErrors};
pub use field_errors::FieldErrors;
