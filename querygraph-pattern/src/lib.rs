//! Pattern model for the querygraph query-composition core.
//!
//! This crate defines the data that flows from a composed graph edge toward
//! the query assembler:
//!
//! - [`Term`]: the constant and variable terms that can appear in a pattern
//! - [`EdgeDescriptor`]: one domain → property → range step of the graph
//! - [`SelectedValue`]: a concrete value the user committed for an edge
//! - [`EdgeSelection`]: the current selection state of one edge
//! - [`QueryFragment`]: the triple or value-set contribution an edge emits
//!
//! The translation rule is driven purely by selection cardinality: exactly
//! one value inlines a single triple (the blocking path), two or more values
//! emit one value-set disjunction, and an empty selection contributes
//! nothing.
//!
//! # Example
//!
//! ```
//! use querygraph_pattern::{
//!     EdgeDescriptor, EdgeSelection, QueryFragment, SelectedValue, ValueRepetition,
//! };
//!
//! let edge = EdgeDescriptor::new(
//!     "http://example.org/Museum",
//!     "http://example.org/displays",
//!     "http://example.org/Artwork",
//!     "Museum_1",
//!     "Artwork_2",
//! );
//! let mut selection = EdgeSelection::new(edge, ValueRepetition::Multiple);
//! selection
//!     .commit(vec![SelectedValue::uri_ref(
//!         "http://example.org/MonaLisa",
//!         "Mona Lisa",
//!     )])
//!     .unwrap();
//!
//! assert!(selection.is_blocking());
//! assert!(matches!(
//!     selection.fragment(),
//!     Some(QueryFragment::Triple { .. })
//! ));
//! ```

mod edge;
mod error;
mod fragment;
mod selection;
mod term;
mod value;

pub use edge::EdgeDescriptor;
pub use error::{PatternError, Result};
pub use fragment::QueryFragment;
pub use selection::EdgeSelection;
pub use term::Term;
pub use value::{SelectedValue, ValueRepetition, XSD_GYEAR};
