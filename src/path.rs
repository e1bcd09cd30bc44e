//! Locations of failures inside nested records.
//!
//! [`FieldErrors::leaves`](crate::FieldErrors::leaves) reports each failure
//! deep inside a record together with the [`FieldPath`] that leads to it,
//! rendered like `orders[0].lines[2].sku`.

use std::fmt::{self, Display};

/// One step into a record (a field name) or a sequence (an element index).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

/// The fields and element indices leading from a top-level record to a
/// failing value. Always starts with a field name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    pub(crate) fn from_segments(segments: &[PathSegment]) -> Self {
        Self(segments.to_vec())
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// The top-level field the failure belongs to.
    pub fn field(&self) -> &str {
        match self.0.first() {
            Some(PathSegment::Field(name)) => name,
            _ => "",
        }
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if i == 0 => f.write_str(name)?,
                PathSegment::Field(name) => write!(f, ".{}", name)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str) -> PathSegment {
        PathSegment::Field(name.to_string())
    }

    #[test]
    fn test_display_joins_fields_and_indices() {
        let path = FieldPath::from_segments(&[
            field("orders"),
            PathSegment::Index(0),
            field("lines"),
            PathSegment::Index(2),
            field("sku"),
        ]);
        assert_eq!(path.to_string(), "orders[0].lines[2].sku");
        assert_eq!(path.field(), "orders");
    }

    #[test]
    fn test_nested_sequences() {
        let path = FieldPath::from_segments(&[
            field("grid"),
            PathSegment::Index(1),
            PathSegment::Index(3),
        ]);
        assert_eq!(path.to_string(), "grid[1][3]");
    }
}
