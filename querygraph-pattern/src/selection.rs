//! Edge selection state and the selection → fragment translation.

use crate::edge::EdgeDescriptor;
use crate::error::{PatternError, Result};
use crate::fragment::QueryFragment;
use crate::value::{SelectedValue, ValueRepetition};
use serde::{Deserialize, Serialize};

/// The current selection state of one edge.
///
/// Owns the edge descriptor plus whatever values the user has committed for
/// it. Selections are replaced wholesale on re-selection; widgets never
/// mutate individual entries in place.
///
/// The two predicates [`is_blocking`](Self::is_blocking) and
/// [`has_any_selection`](Self::has_any_selection) are computed directly from
/// the value count so callers can probe them before any fragment is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSelection {
    edge: EdgeDescriptor,
    repetition: ValueRepetition,
    values: Vec<SelectedValue>,
}

impl EdgeSelection {
    /// Create an empty selection for an edge.
    pub fn new(edge: EdgeDescriptor, repetition: ValueRepetition) -> Self {
        Self {
            edge,
            repetition,
            values: Vec::new(),
        }
    }

    /// The edge this selection belongs to.
    pub fn edge(&self) -> &EdgeDescriptor {
        &self.edge
    }

    /// The widget's repetition mode.
    pub fn repetition(&self) -> ValueRepetition {
        self.repetition
    }

    /// The currently committed values.
    pub fn values(&self) -> &[SelectedValue] {
        &self.values
    }

    /// Replace the selection with a new set of values.
    ///
    /// A [`ValueRepetition::Single`] widget rejects more than one value with
    /// [`PatternError::AmbiguousSelection`]; the previous selection is kept
    /// in that case.
    pub fn commit(&mut self, values: Vec<SelectedValue>) -> Result<()> {
        if self.repetition == ValueRepetition::Single && values.len() > 1 {
            return Err(PatternError::AmbiguousSelection {
                count: values.len(),
            });
        }
        self.values = values;
        Ok(())
    }

    /// Remove all committed values.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// True iff exactly one value is present.
    ///
    /// A blocking selection fully determines the edge with a single triple,
    /// so the walker needs no value-set and no extra type constraint on the
    /// object.
    pub fn is_blocking(&self) -> bool {
        self.values.len() == 1
    }

    /// True iff at least one value is present.
    pub fn has_any_selection(&self) -> bool {
        !self.values.is_empty()
    }

    /// Translate the selection into its query fragment.
    ///
    /// - no values: `None`, the edge contributes no constraint yet;
    /// - one value: a single [`QueryFragment::Triple`] inlining the value's
    ///   constant term against the subject variable;
    /// - two or more values: one [`QueryFragment::ValueSet`] over the object
    ///   variable, one term per value, duplicates preserved as given.
    pub fn fragment(&self) -> Option<QueryFragment> {
        match self.values.as_slice() {
            [] => None,
            [single] => Some(QueryFragment::Triple {
                subject: self.edge.subject_var.clone(),
                predicate: self.edge.property.clone(),
                object: single.term(),
            }),
            many => Some(QueryFragment::ValueSet {
                variable: self.edge.object_var.clone(),
                values: many.iter().map(SelectedValue::term).collect(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Term;

    fn edge() -> EdgeDescriptor {
        EdgeDescriptor::new(
            "http://example.org/Museum",
            "http://example.org/displays",
            "http://example.org/Artwork",
            "Museum_1",
            "Artwork_2",
        )
    }

    #[test]
    fn test_empty_selection_emits_nothing() {
        let selection = EdgeSelection::new(edge(), ValueRepetition::Multiple);
        assert!(selection.fragment().is_none());
        assert!(!selection.has_any_selection());
        assert!(!selection.is_blocking());
    }

    #[test]
    fn test_single_value_is_blocking_triple() {
        let mut selection = EdgeSelection::new(edge(), ValueRepetition::Multiple);
        selection
            .commit(vec![SelectedValue::uri_ref(
                "http://example.org/MonaLisa",
                "Mona Lisa",
            )])
            .unwrap();

        assert!(selection.is_blocking());
        assert!(selection.has_any_selection());

        let fragment = selection.fragment().unwrap();
        assert_eq!(
            fragment,
            QueryFragment::Triple {
                subject: "Museum_1".to_string(),
                predicate: "http://example.org/displays".to_string(),
                object: Term::iri("http://example.org/MonaLisa"),
            }
        );
    }

    #[test]
    fn test_multiple_values_emit_value_set() {
        let mut selection = EdgeSelection::new(edge(), ValueRepetition::Multiple);
        selection
            .commit(vec![
                SelectedValue::uri_ref("http://example.org/MonaLisa", "Mona Lisa"),
                SelectedValue::uri_ref("http://example.org/TheScream", "The Scream"),
                SelectedValue::uri_ref("http://example.org/MonaLisa", "Mona Lisa"),
            ])
            .unwrap();

        assert!(!selection.is_blocking());
        assert!(selection.has_any_selection());

        match selection.fragment().unwrap() {
            QueryFragment::ValueSet { variable, values } => {
                assert_eq!(variable, "Artwork_2");
                // Duplicates are preserved as given.
                assert_eq!(values.len(), 3);
                assert_eq!(values[0], values[2]);
            }
            other => panic!("expected value set, got {:?}", other),
        }
    }

    #[test]
    fn test_single_pick_widget_rejects_multiple_values() {
        let mut selection = EdgeSelection::new(edge(), ValueRepetition::Single);
        selection
            .commit(vec![SelectedValue::literal("first")])
            .unwrap();

        let err = selection
            .commit(vec![
                SelectedValue::literal("a"),
                SelectedValue::literal("b"),
            ])
            .unwrap_err();
        assert!(matches!(
            err,
            PatternError::AmbiguousSelection { count: 2 }
        ));

        // The previous selection survives a rejected commit.
        assert_eq!(selection.values().len(), 1);
    }

    #[test]
    fn test_reselection_replaces_wholesale() {
        let mut selection = EdgeSelection::new(edge(), ValueRepetition::Multiple);
        selection
            .commit(vec![
                SelectedValue::literal("a"),
                SelectedValue::literal("b"),
            ])
            .unwrap();
        selection
            .commit(vec![SelectedValue::literal("c")])
            .unwrap();

        assert_eq!(selection.values().len(), 1);
        assert!(selection.is_blocking());
    }

    #[test]
    fn test_clear_removes_constraint() {
        let mut selection = EdgeSelection::new(edge(), ValueRepetition::Multiple);
        selection
            .commit(vec![SelectedValue::literal("a")])
            .unwrap();
        selection.clear();

        assert!(selection.fragment().is_none());
        assert!(!selection.has_any_selection());
    }

    #[test]
    fn test_literal_selection_keeps_datatype_in_triple() {
        let mut selection = EdgeSelection::new(edge(), ValueRepetition::Multiple);
        selection
            .commit(vec![SelectedValue::typed_literal(
                "1503",
                "http://www.w3.org/2001/XMLSchema#gYear",
            )])
            .unwrap();

        match selection.fragment().unwrap() {
            QueryFragment::Triple { object, .. } => {
                assert_eq!(
                    object,
                    Term::typed_literal("1503", "http://www.w3.org/2001/XMLSchema#gYear")
                );
            }
            other => panic!("expected triple, got {:?}", other),
        }
    }
}
