//! Pattern terms.
//!
//! A [`Term`] is the closed set of things that can stand in the object
//! position of a fragment: an IRI, a literal, or a variable. `Display`
//! renders SPARQL surface syntax so the assembler can concatenate terms
//! directly into query text.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A constant or variable term in a query pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Term {
    /// An IRI reference, stored without angle brackets.
    Iri(String),

    /// An RDF literal with optional datatype or language tag.
    ///
    /// A literal carries at most one of `datatype` and `lang`; when both are
    /// set the language tag wins at render time, matching SPARQL surface
    /// syntax where a tagged literal cannot also carry a datatype.
    Literal {
        /// The lexical form.
        value: String,
        /// Datatype IRI, without angle brackets.
        #[serde(skip_serializing_if = "Option::is_none")]
        datatype: Option<String>,
        /// Language tag, without the leading `@`.
        #[serde(skip_serializing_if = "Option::is_none")]
        lang: Option<String>,
    },

    /// A variable name, stored without the leading `?`.
    Variable(String),
}

impl Term {
    /// Create an IRI term.
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    /// Create a plain literal term.
    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal {
            value: value.into(),
            datatype: None,
            lang: None,
        }
    }

    /// Create a typed literal term.
    pub fn typed_literal(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Term::Literal {
            value: value.into(),
            datatype: Some(datatype.into()),
            lang: None,
        }
    }

    /// Create a language-tagged literal term.
    pub fn lang_literal(value: impl Into<String>, lang: impl Into<String>) -> Self {
        Term::Literal {
            value: value.into(),
            datatype: None,
            lang: Some(lang.into()),
        }
    }

    /// Create a variable term.
    pub fn variable(name: impl Into<String>) -> Self {
        Term::Variable(name.into())
    }

    /// Whether this term is a constant (IRI or literal) rather than a variable.
    pub fn is_constant(&self) -> bool {
        !matches!(self, Term::Variable(_))
    }
}

/// Escape a literal's lexical form for embedding between double quotes.
fn escape_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{}>", iri),
            Term::Literal {
                value,
                datatype,
                lang,
            } => {
                write!(f, "\"{}\"", escape_literal(value))?;
                if let Some(lang) = lang {
                    write!(f, "@{}", lang)
                } else if let Some(dt) = datatype {
                    write!(f, "^^<{}>", dt)
                } else {
                    Ok(())
                }
            }
            Term::Variable(name) => write!(f, "?{}", name),
        }
    }
}
