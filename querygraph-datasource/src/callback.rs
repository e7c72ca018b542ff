//! Callback-delegating handler.

use crate::config::{DataSourceConfig, EndpointOverride};
use crate::error::{DataSourceError, Result};
use crate::handler::DataSourceHandler;
use crate::request::{RequestDescriptor, SPARQL_RESULTS_ACCEPT};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

type SearchUrlFn = dyn Fn(&str, &str, &str, &str) -> String + Send + Sync;
type ListUrlFn = dyn Fn(&str, &str, &str) -> String + Send + Sync;
type FieldFn = dyn Fn(&Value) -> Option<String> + Send + Sync;
type YearFn = dyn Fn(&Value) -> Option<i32> + Send + Sync;

/// Handler that delegates URL construction to caller-supplied closures, for
/// backends with service-specific query shapes that neither template
/// substitution nor generated SPARQL can express.
///
/// The produced URL still goes through endpoint-override matching: an
/// override whose endpoint URL is a prefix of the built URL contributes its
/// method, headers, mode, credentials and cache directives.
///
/// Record extraction defaults to the canonical contract; custom label,
/// value and year-boundary extractors can be supplied for nested response
/// shapes.
pub struct CallbackHandler {
    overrides: Vec<EndpointOverride>,
    search_url: Box<SearchUrlFn>,
    list_url: Box<ListUrlFn>,
    label_fn: Option<Box<FieldFn>>,
    value_fn: Option<Box<FieldFn>>,
    start_fn: Option<Box<YearFn>>,
    stop_fn: Option<Box<YearFn>>,
    match_enabled: bool,
}

impl CallbackHandler {
    /// Create a callback handler from search and list URL builders.
    pub fn new(
        config: &DataSourceConfig,
        search_url: impl Fn(&str, &str, &str, &str) -> String + Send + Sync + 'static,
        list_url: impl Fn(&str, &str, &str) -> String + Send + Sync + 'static,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            overrides: config.endpoints.clone(),
            search_url: Box::new(search_url),
            list_url: Box::new(list_url),
            label_fn: None,
            value_fn: None,
            start_fn: None,
            stop_fn: None,
            match_enabled: false,
        })
    }

    /// Supply a custom label extractor.
    pub fn with_label_fn(
        mut self,
        f: impl Fn(&Value) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.label_fn = Some(Box::new(f));
        self
    }

    /// Supply a custom value extractor.
    pub fn with_value_fn(
        mut self,
        f: impl Fn(&Value) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.value_fn = Some(Box::new(f));
        self
    }

    /// Supply a custom start-year extractor for date-range records.
    pub fn with_start_fn(
        mut self,
        f: impl Fn(&Value) -> Option<i32> + Send + Sync + 'static,
    ) -> Self {
        self.start_fn = Some(Box::new(f));
        self
    }

    /// Supply a custom stop-year extractor for date-range records.
    pub fn with_stop_fn(
        mut self,
        f: impl Fn(&Value) -> Option<i32> + Send + Sync + 'static,
    ) -> Self {
        self.stop_fn = Some(Box::new(f));
        self
    }

    /// Enable in-place disambiguation for edges served by this handler.
    pub fn with_match_enabled(mut self, enabled: bool) -> Self {
        self.match_enabled = enabled;
        self
    }

    fn descriptor_for(&self, url: String) -> RequestDescriptor {
        let mut method = "GET".to_string();
        let mut headers = BTreeMap::new();
        headers.insert("Accept".to_string(), SPARQL_RESULTS_ACCEPT.to_string());
        let mut mode = Some("cors".to_string());
        let mut credentials = None;
        let mut cache = Some("default".to_string());

        if let Some(config) = self.overrides.iter().find(|o| url.starts_with(&o.endpoint)) {
            debug!(endpoint = %config.endpoint, "applying endpoint override to callback URL");
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

impl DataSourceHandler for CallbackHandler {
    fn build_search_request(
        &self,
        domain: &str,
        property: &str,
        range: &str,
        key: &str,
    ) -> Result<RequestDescriptor> {
        let url = (self.search_url)(domain, property, range, key);
        Ok(self.descriptor_for(url))
    }

    fn build_list_request(
        &self,
        domain: &str,
        property: &str,
        range: &str,
    ) -> Result<RequestDescriptor> {
        let url = (self.list_url)(domain, property, range);
        Ok(self.descriptor_for(url))
    }

    fn extract_label(&self, record: &Value) -> Result<String> {
        match &self.label_fn {
            Some(f) => f(record).ok_or_else(|| {
                DataSourceError::malformed_record("custom label extractor matched no field")
            }),
            None => crate::handler::default_extract_label(record),
        }
    }

    fn extract_value(&self, record: &Value) -> Result<String> {
        match &self.value_fn {
            Some(f) => f(record).ok_or_else(|| {
                DataSourceError::malformed_record("custom value extractor matched no field")
            }),
            None => crate::handler::default_extract_value(record),
        }
    }

    fn extract_start(&self, record: &Value) -> Option<i32> {
        match &self.start_fn {
            Some(f) => f(record),
            None => crate::handler::binding_year(record, "start"),
        }
    }

    fn extract_stop(&self, record: &Value) -> Option<i32> {
        match &self.stop_fn {
            Some(f) => f(record),
            None => crate::handler::binding_year(record, "stop"),
        }
    }

    fn supports_match(&self, _domain: &str, _property: &str, _range: &str) -> bool {
        self.match_enabled
    }
}
