//! Field definitions.

use std::fmt;

use crate::converter::{apply_chain, Converter};
use crate::error::ConversionError;
use crate::value::Value;

/// A named field and its converter chain.
#[derive(Clone)]
pub struct Field {
    name: String,
    converters: Vec<Converter>,
}

impl Field {
    pub fn new<I>(name: impl Into<String>, converters: I) -> Self
    where
        I: IntoIterator<Item = Converter>,
    {
        Self {
            name: name.into(),
            converters: converters.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn converters(&self) -> &[Converter] {
        &self.converters
    }

    /// Runs the field's chain on `value`.
    pub fn convert(&self, value: Value) -> Result<Value, ConversionError> {
        apply_chain(value, &self.converters)
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("converters", &self.converters.len())
            .finish()
    }
}
