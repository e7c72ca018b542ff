//! Response cache for querygraph data-source fetches.
//!
//! Candidate-value fetches for different edges often repeat the exact same
//! request (same endpoint, same generated query). This crate deduplicates
//! and time-bounds them:
//!
//! - [`ResponseCache`]: in-memory map from a normalized request signature to
//!   a previously fetched payload, with TTL expiry on read and single-flight
//!   deduplication of concurrent identical fetches
//! - [`Transport`]: the only network boundary — an async primitive that
//!   performs one [`RequestDescriptor`] and decodes the JSON body
//! - [`HttpTransport`]: reqwest-backed transport with timeouts
//!
//! Failures are never cached; a subsequent call with the same signature
//! retries from scratch.
//!
//! [`RequestDescriptor`]: querygraph_datasource::RequestDescriptor

mod cache;
mod error;
mod transport;

pub use cache::{ResponseCache, DEFAULT_MAX_ENTRIES};
pub use error::{CacheError, Result};
pub use transport::{HttpTransport, Transport};
