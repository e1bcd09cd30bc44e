//! # Mapparse
//!
//! Parses loosely typed maps (form posts, query strings, decoded JSON) into
//! validated records, collecting an error for every field that fails instead
//! of stopping at the first one.
//!
//! ## Overview
//!
//! A [`Type`] declares named fields. Each field has an ordered chain of
//! converters; a converter normalizes, coerces or checks a [`Value`] and the
//! chain stops at the first failure. Parsing a [`Map`] with a type always
//! yields a [`Record`]: the converted attributes plus the [`FieldErrors`] of
//! the fields that failed.
//!
//! The optional `shell` feature adds named async commands whose params are
//! parsed by a type, and the `http` feature serves those commands as JSON
//! endpoints with axum.
//!
//! ## Core Types
//!
//! - [`Value`]: the dynamically typed values that flow through converters
//! - [`ValueConverter`] / [`Converter`]: one step of a field's chain
//! - [`Type`]: the field declarations, and a converter for nested records
//! - [`Record`]: the result of parsing one map
//! - [`ConversionError`] / [`FieldErrors`]: why a field or record failed
//!
//! ## Example
//!
//! ```rust
//! use mapparse::converter::{int32, required, single_line_string};
//! use mapparse::{Type, Value};
//! use serde_json::json;
//!
//! let person = Type::new()
//!     .field("name", [required(), single_line_string()])
//!     .field("age", [required(), int32()]);
//!
//! let input = Value::from(json!({"name": " Ann\r\n", "age": "forty"}))
//!     .into_map()
//!     .unwrap();
//! let record = person.parse(input);
//!
//! assert_eq!(record.get("name"), &Value::from("Ann"));
//! assert_eq!(record.errors().unwrap().to_string(), "age not a valid number");
//! ```

pub mod converter;
pub mod error;
pub mod path;
pub mod schema;
pub mod value;

#[cfg(feature = "shell")]
pub mod shell;

#[cfg(feature = "http")]
pub mod http;

pub use converter::{Converter, ValueConverter};
pub use error::{ConversionError, ElementError, ElementErrors, FieldErrors};
pub use path::{FieldPath, PathSegment};
pub use schema::{Field, Record, Type};
pub use value::{Map, Value};

/// A parsed record, or the errors of the fields that failed.
pub type ParseResult = stillwater::Validation<Record, FieldErrors>;
