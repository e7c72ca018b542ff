//! Selected values.
//!
//! A [`SelectedValue`] is one concrete value the user confirmed for an
//! edge's range. It is owned by the edge's selection state, replaced
//! wholesale on re-selection, and dropped when the edge leaves the graph.

use crate::term::Term;
use serde::{Deserialize, Serialize};

/// The `xsd:gYear` datatype used for date-boundary terms.
pub const XSD_GYEAR: &str = "http://www.w3.org/2001/XMLSchema#gYear";

/// How many values a widget kind may hold at once.
///
/// `Single` widgets (a plain dropdown pick) reject committing more than one
/// value; `Multiple` widgets accumulate a set that translates to a value-set
/// disjunction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueRepetition {
    /// Exactly one value; will be inlined as a single triple.
    Single,
    /// A set of values; two or more use a value-list pattern.
    Multiple,
}

/// A concrete value chosen by the user for an edge's range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectedValue {
    /// A URI reference picked from a list or autocomplete result.
    UriRef {
        /// Stable key of the pick (usually the URI itself).
        key: String,
        /// Display label.
        label: String,
        /// The canonical URI.
        uri: String,
    },

    /// A typed literal value (e.g. from a free-text or number widget).
    Literal {
        /// The lexical form.
        value: String,
        /// Datatype IRI, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        datatype: Option<String>,
    },

    /// A year-boundary pair from a date-range widget.
    DateRange {
        /// Display label for the range.
        label: String,
        /// Inclusive start year, if bounded below.
        #[serde(skip_serializing_if = "Option::is_none")]
        start_year: Option<i32>,
        /// Inclusive stop year, if bounded above.
        #[serde(skip_serializing_if = "Option::is_none")]
        stop_year: Option<i32>,
    },
}

impl SelectedValue {
    /// Create a URI reference whose key doubles as the URI, the common case
    /// for list picks.
    pub fn uri_ref(uri: impl Into<String>, label: impl Into<String>) -> Self {
        let uri = uri.into();
        SelectedValue::UriRef {
            key: uri.clone(),
            label: label.into(),
            uri,
        }
    }

    /// Create a plain literal value.
    pub fn literal(value: impl Into<String>) -> Self {
        SelectedValue::Literal {
            value: value.into(),
            datatype: None,
        }
    }

    /// Create a typed literal value.
    pub fn typed_literal(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        SelectedValue::Literal {
            value: value.into(),
            datatype: Some(datatype.into()),
        }
    }

    /// Create a date-range value.
    pub fn date_range(
        label: impl Into<String>,
        start_year: Option<i32>,
        stop_year: Option<i32>,
    ) -> Self {
        SelectedValue::DateRange {
            label: label.into(),
            start_year,
            stop_year,
        }
    }

    /// The display label of this value.
    pub fn label(&self) -> &str {
        match self {
            SelectedValue::UriRef { label, .. } => label,
            SelectedValue::Literal { value, .. } => value,
            SelectedValue::DateRange { label, .. } => label,
        }
    }

    /// The constant term this value contributes to a fragment.
    ///
    /// A date range has no single constant term; it degrades to its label
    /// literal here, with the boundary pair exposed through [`start_term`]
    /// and [`stop_term`] for assemblers that compose range filters.
    ///
    /// [`start_term`]: SelectedValue::start_term
    /// [`stop_term`]: SelectedValue::stop_term
    pub fn term(&self) -> Term {
        match self {
            SelectedValue::UriRef { uri, .. } => Term::iri(uri.clone()),
            SelectedValue::Literal { value, datatype } => Term::Literal {
                value: value.clone(),
                datatype: datatype.clone(),
                lang: None,
            },
            SelectedValue::DateRange { label, .. } => Term::literal(label.clone()),
        }
    }

    /// The `xsd:gYear` term for the lower boundary of a date range.
    pub fn start_term(&self) -> Option<Term> {
        match self {
            SelectedValue::DateRange {
                start_year: Some(year),
                ..
            } => Some(Term::typed_literal(year.to_string(), XSD_GYEAR)),
            _ => None,
        }
    }

    /// The `xsd:gYear` term for the upper boundary of a date range.
    pub fn stop_term(&self) -> Option<Term> {
        match self {
            SelectedValue::DateRange {
                stop_year: Some(year),
                ..
            } => Some(Term::typed_literal(year.to_string(), XSD_GYEAR)),
            _ => None,
        }
    }
}
