//! Record types and parsed records.
//!
//! A [`Type`] declares fields, each with a chain of converters. Parsing a
//! map with a type yields a [`Record`] holding the converted attributes and
//! the error of every field that failed, so one pass reports every problem
//! in the input.
//!
//! # Example
//!
//! ```rust
//! use mapparse::converter::{int32, required};
//! use mapparse::{Type, Value};
//! use serde_json::json;
//!
//! let ty = Type::new()
//!     .field("a", [required(), int32()])
//!     .field("b", [required(), int32()]);
//!
//! let input = Value::from(json!({"a": "1", "b": "abc"})).into_map().unwrap();
//! let record = ty.parse(input);
//!
//! assert_eq!(record.get("a"), &Value::Int32(1));
//! assert_eq!(record.errors().unwrap().to_string(), "b not a valid number");
//! ```

mod field;
mod record;
mod record_type;

pub use field::Field;
pub use record::Record;
pub use record_type::Type;
