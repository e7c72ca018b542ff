//! Request descriptors and the shared request-building step.

use crate::config::{DataSourceConfig, EndpointOverride};
use crate::error::Result;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Caller-supplied hook rewriting query text before URL embedding.
pub type PostProcessFn = dyn Fn(String) -> String + Send + Sync;

/// Accept header value for SPARQL JSON results.
pub const SPARQL_RESULTS_ACCEPT: &str =
    "application/sparql-results+json, application/json, */*;q=0.01";

/// Characters percent-encoded when embedding query text into a URL.
/// Everything except unreserved characters, matching `encodeURIComponent`
/// closely enough for SPARQL payloads.
const QUERY_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// A fully built request for one search or list attempt.
///
/// Immutable once built; one instance per attempt. The descriptor carries
/// everything the transport needs plus the browser-style mode, credentials
/// and cache directives the host application may forward to its own fetch
/// layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    /// HTTP method.
    pub method: String,

    /// Fully built target URL, query text already embedded.
    pub url: String,

    /// Request headers. Sorted by name.
    pub headers: BTreeMap<String, String>,

    /// Request mode directive (e.g. "cors").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    /// Credentials mode directive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<String>,

    /// Cache directive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<String>,
}

impl RequestDescriptor {
    /// Normalized identity of this request, used as the cache key.
    ///
    /// Derived from method, URL and the header set; the mode, credentials
    /// and cache directives do not change what the endpoint returns and are
    /// excluded.
    pub fn signature(&self) -> String {
        let mut signature = format!("{} {}", self.method.to_uppercase(), self.url);
        for (name, value) in &self.headers {
            signature.push('\n');
            signature.push_str(&name.to_lowercase());
            signature.push(':');
            signature.push_str(value);
        }
        signature
    }
}

/// The shared request-building step all SPARQL-speaking handlers go through.
///
/// Holds the handler's target endpoint plus the endpoint overrides from the
/// configuration snapshot. Overrides are validated once at construction;
/// an invalid entry is fatal to building the handler.
///
/// An optional post-processing hook lets the host rewrite the query text
/// (prefix injection, named-graph scoping) after expansion but before
/// percent-encoding.
#[derive(Clone)]
pub struct RequestBuilder {
    endpoint: String,
    overrides: Vec<EndpointOverride>,
    post_process: Option<Arc<PostProcessFn>>,
}

impl RequestBuilder {
    /// Create a builder for an endpoint, validating the configured overrides.
    pub fn new(endpoint: impl Into<String>, config: &DataSourceConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            endpoint: endpoint.into(),
            overrides: config.endpoints.clone(),
            post_process: None,
        })
    }

    /// Install a query post-processing hook.
    pub fn with_post_process(
        mut self,
        f: impl Fn(String) -> String + Send + Sync + 'static,
    ) -> Self {
        self.post_process = Some(Arc::new(f));
        self
    }

    /// The endpoint this builder targets.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build the request descriptor for a SPARQL query against the endpoint.
    ///
    /// The query text runs through the post-processing hook (if any), then
    /// is percent-encoded into a `query=` parameter with a `format=json`
    /// companion, appended with `?` or `&` depending on whether the
    /// endpoint already carries query parameters. Defaults are GET / cors /
    /// default-cache with a SPARQL-results Accept header; a matching
    /// [`EndpointOverride`] replaces individual fields, including the
    /// endpoint URL itself.
    pub fn build(&self, sparql: &str) -> RequestDescriptor {
        let sparql = match &self.post_process {
            Some(f) => f(sparql.to_string()),
            None => sparql.to_string(),
        };
        let mut endpoint = self.endpoint.clone();
        let mut method = "GET".to_string();
        let mut headers = BTreeMap::new();
        headers.insert("Accept".to_string(), SPARQL_RESULTS_ACCEPT.to_string());
        let mut mode = Some("cors".to_string());
        let mut credentials = None;
        let mut cache = Some("default".to_string());

        if let Some(config) = self.overrides.iter().find(|o| o.endpoint == self.endpoint) {
            debug!(endpoint = %self.endpoint, "applying endpoint override");
            endpoint = config.endpoint.clone();
            if let Some(m) = &config.method {
                method = m.clone();
            }
            if let Some(h) = &config.headers {
                headers = h.clone();
            }
            if let Some(m) = &config.mode {
                mode = Some(m.clone());
            }
            if let Some(c) = &config.credentials {
                credentials = Some(c.clone());
            }
            if let Some(c) = &config.cache {
                cache = Some(c.clone());
            }
        }

        let separator = if endpoint.contains('?') { '&' } else { '?' };
        let url = format!(
            "{}{}query={}&format=json",
            endpoint,
            separator,
            utf8_percent_encode(&sparql, QUERY_ENCODE)
        );

        RequestDescriptor {
            method,
            url,
            headers,
            mode,
            credentials,
            cache,
        }
    }
}

impl std::fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("endpoint", &self.endpoint)
            .field("overrides", &self.overrides.len())
            .field("has_post_process", &self.post_process.is_some())
            .finish()
    }
}
