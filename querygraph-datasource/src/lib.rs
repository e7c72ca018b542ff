//! Data-source handlers for the querygraph query-composition core.
//!
//! Given one edge of the composed graph (domain type, property, range type),
//! this crate decides *how* candidate values for that edge are fetched from
//! a remote SPARQL endpoint:
//!
//! - [`DataSourceHandler`]: the capability set a concrete handler provides —
//!   building search and list requests, locating result records in a
//!   response body, and pulling label/value out of one record
//! - [`SparqlTemplateHandler`]: literal `$domain`/`$property`/`$range`/
//!   `$lang`/`$key` substitution into a caller-supplied query template
//! - [`GeneratedSparqlHandler`]: programmatically generated query text
//!   driven by a label search path and a list ordering mode
//! - [`CallbackHandler`]: delegation to caller-supplied URL builders for
//!   service-specific query shapes
//! - [`HandlerResolver`]: range- or property-keyed dispatch table with a
//!   default fallback
//!
//! All handlers share one request-building step that percent-encodes the
//! query text into the endpoint URL and merges per-endpoint overrides from
//! the configuration snapshot.

mod callback;
mod config;
mod error;
mod generated;
mod handler;
mod request;
mod resolver;
mod template;

pub use callback::CallbackHandler;
pub use config::{DataSourceConfig, EndpointOverride, ListOrder, DEFAULT_TTL_MS};
pub use error::{DataSourceError, Result};
pub use generated::{GeneratedSparqlHandler, DEFAULT_SEARCH_LIMIT};
pub use handler::DataSourceHandler;
pub use request::{RequestBuilder, RequestDescriptor, SPARQL_RESULTS_ACCEPT};
pub use resolver::{DispatchKey, HandlerResolver};
pub use template::SparqlTemplateHandler;

/// Default label search path when none is configured.
pub const DEFAULT_SEARCH_PATH: &str = "rdfs:label";
