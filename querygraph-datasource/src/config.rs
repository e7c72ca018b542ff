//! Data-source configuration snapshot.
//!
//! The configuration is assembled once by the host application (defaults
//! overridden field by field, no deep merging) and passed read-only into
//! handler and resolver constructors. Core logic never consults a global.

use crate::error::{DataSourceError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default cache TTL: 24 hours, in milliseconds.
pub const DEFAULT_TTL_MS: u64 = 1000 * 60 * 60 * 24;

/// Ordering mode for list requests.
///
/// The ordering is encoded directly into the generated query text, never
/// applied client-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ListOrder {
    /// Order entries by label.
    #[default]
    Alphabetical,
    /// Order entries by descending occurrence count.
    Count,
    /// Order by label, with the occurrence count appended to each label.
    AlphabeticalWithCount,
}

/// Per-endpoint request override.
///
/// When a handler's target endpoint matches the `endpoint` URL of one of
/// these entries, the entry's fields are copied over the request defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointOverride {
    /// The endpoint URL this override applies to. Also the replacement URL.
    pub endpoint: String,

    /// HTTP method override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    /// Headers override (replaces the default header set).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,

    /// Request mode override (e.g. "cors", "no-cors").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    /// Credentials mode override (e.g. "include", "omit").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<String>,

    /// Cache directive override (e.g. "default", "no-store").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<String>,
}

impl EndpointOverride {
    /// Create an override for an endpoint URL.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method: None,
            headers: None,
            mode: None,
            credentials: None,
            cache: None,
        }
    }

    /// Set the method override.
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Set a header override.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Set the credentials override.
    pub fn with_credentials(mut self, credentials: impl Into<String>) -> Self {
        self.credentials = Some(credentials.into());
        self
    }

    /// Set the cache directive override.
    pub fn with_cache(mut self, cache: impl Into<String>) -> Self {
        self.cache = Some(cache.into());
        self
    }

    /// Validate the override fields.
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(DataSourceError::configuration(
                "endpoint in endpoint overrides must be a non-empty URL",
            ));
        }
        Ok(())
    }
}

/// Read-only configuration snapshot for handlers, resolvers and the cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSourceConfig {
    /// Language used to constrain matched labels. When absent, generated
    /// query text emits no language filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Process-wide default cache TTL in milliseconds. Zero disables the
    /// cache read path.
    #[serde(default = "default_ttl")]
    pub default_ttl_ms: u64,

    /// Per-endpoint request overrides.
    #[serde(default)]
    pub endpoints: Vec<EndpointOverride>,

    /// Property path used to reach the searchable label of a candidate.
    /// Defaults to `rdfs:label` at handler-build time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_path: Option<String>,

    /// Ordering mode for list requests.
    #[serde(default)]
    pub list_order: ListOrder,
}

fn default_ttl() -> u64 {
    DEFAULT_TTL_MS
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self {
            language: None,
            default_ttl_ms: DEFAULT_TTL_MS,
            endpoints: Vec::new(),
            search_path: None,
            list_order: ListOrder::Alphabetical,
        }
    }
}

impl DataSourceConfig {
    /// Set the language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set the default TTL in milliseconds.
    pub fn with_default_ttl_ms(mut self, ttl_ms: u64) -> Self {
        self.default_ttl_ms = ttl_ms;
        self
    }

    /// Add an endpoint override.
    pub fn with_endpoint(mut self, endpoint: EndpointOverride) -> Self {
        self.endpoints.push(endpoint);
        self
    }

    /// Set the label search path.
    pub fn with_search_path(mut self, path: impl Into<String>) -> Self {
        self.search_path = Some(path.into());
        self
    }

    /// Set the list ordering mode.
    pub fn with_list_order(mut self, order: ListOrder) -> Self {
        self.list_order = order;
        self
    }

    /// Validate all endpoint overrides.
    pub fn validate(&self) -> Result<()> {
        for endpoint in &self.endpoints {
            endpoint.validate()?;
        }
        Ok(())
    }
}
