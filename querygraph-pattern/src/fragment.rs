//! Query fragments.

use crate::term::Term;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One edge's contribution to the assembled query.
///
/// Exactly one fragment kind is produced per edge per evaluation; the kind
/// is fully determined by the cardinality of the edge's selection (see
/// [`EdgeSelection::fragment`](crate::EdgeSelection::fragment)).
///
/// `Display` renders the SPARQL surface form of the fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryFragment {
    /// A single triple pattern binding the edge's subject variable to a
    /// constant object term.
    Triple {
        /// Subject variable, without the leading `?`.
        subject: String,
        /// Predicate IRI, without angle brackets.
        predicate: String,
        /// The object term (constant or variable).
        object: Term,
    },

    /// A value-set disjunction over the edge's object variable.
    ValueSet {
        /// The bound variable, without the leading `?`.
        variable: String,
        /// One constant term per selected value, duplicates preserved.
        values: Vec<Term>,
    },
}

impl QueryFragment {
    /// Number of constant terms this fragment constrains the edge with.
    pub fn term_count(&self) -> usize {
        match self {
            QueryFragment::Triple { .. } => 1,
            QueryFragment::ValueSet { values, .. } => values.len(),
        }
    }
}

impl fmt::Display for QueryFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryFragment::Triple {
                subject,
                predicate,
                object,
            } => write!(f, "?{} <{}> {} .", subject, predicate, object),
            QueryFragment::ValueSet { variable, values } => {
                write!(f, "VALUES ?{} {{", variable)?;
                for value in values {
                    write!(f, " {}", value)?;
                }
                write!(f, " }}")
            }
        }
    }
}
