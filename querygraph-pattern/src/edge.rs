//! Edge descriptors.

use serde::{Deserialize, Serialize};

/// One domain → property → range step of the composed query graph.
///
/// The descriptor is immutable once the user has committed a selection for
/// this step. Variable names identify the subject and object bindings the
/// surrounding graph walker has allocated for the two ends of the edge, and
/// carry no leading `?`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeDescriptor {
    /// Type of the triple subjects (IRI).
    pub domain: String,
    /// The predicate connecting subject and object (IRI).
    pub property: String,
    /// Type of the triple objects (IRI).
    pub range: String,
    /// Variable bound to the subject end.
    pub subject_var: String,
    /// Variable bound to the object end.
    pub object_var: String,
}

impl EdgeDescriptor {
    /// Create a new edge descriptor.
    pub fn new(
        domain: impl Into<String>,
        property: impl Into<String>,
        range: impl Into<String>,
        subject_var: impl Into<String>,
        object_var: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            property: property.into(),
            range: range.into(),
            subject_var: subject_var.into(),
            object_var: object_var.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let edge = EdgeDescriptor::new(
            "http://example.org/Museum",
            "http://example.org/displays",
            "http://example.org/Artwork",
            "Museum_1",
            "Artwork_2",
        );
        let json = serde_json::to_string(&edge).unwrap();
        let parsed: EdgeDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, edge);
    }
}
