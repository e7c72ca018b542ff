//! Fixed-template SPARQL handler.

use crate::config::DataSourceConfig;
use crate::error::Result;
use crate::handler::DataSourceHandler;
use crate::request::{RequestBuilder, RequestDescriptor};
use tracing::trace;

/// Handler driven by caller-supplied SPARQL templates in which the literal
/// placeholders `$domain`, `$property`, `$range`, `$lang` and `$key` are
/// replaced by actual values.
///
/// The three IRI placeholders are substituted in `<angle-bracket>` form; the
/// `$lang` placeholder receives the configured language verbatim (templates
/// quote it themselves), or the empty string when no language is configured;
/// `$key` receives the raw search key. The expanded text then goes through
/// the shared request-building step.
pub struct SparqlTemplateHandler {
    builder: RequestBuilder,
    language: Option<String>,
    search_template: String,
    list_template: String,
    match_enabled: bool,
}

impl SparqlTemplateHandler {
    /// Create a template handler for an endpoint.
    ///
    /// `search_template` is used for [`build_search_request`] and may use
    /// all five placeholders; `list_template` is used for
    /// [`build_list_request`] and has no `$key`.
    ///
    /// Fails with a configuration error when the configured endpoint
    /// overrides are invalid.
    ///
    /// [`build_search_request`]: DataSourceHandler::build_search_request
    /// [`build_list_request`]: DataSourceHandler::build_list_request
    pub fn new(
        endpoint: impl Into<String>,
        config: &DataSourceConfig,
        search_template: impl Into<String>,
        list_template: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            builder: RequestBuilder::new(endpoint, config)?,
            language: config.language.clone(),
            search_template: search_template.into(),
            list_template: list_template.into(),
            match_enabled: false,
        })
    }

    /// Enable in-place disambiguation for edges served by this handler.
    pub fn with_match_enabled(mut self, enabled: bool) -> Self {
        self.match_enabled = enabled;
        self
    }

    /// Install a hook rewriting the expanded query text before URL
    /// embedding.
    pub fn with_post_process(
        mut self,
        f: impl Fn(String) -> String + Send + Sync + 'static,
    ) -> Self {
        self.builder = self.builder.with_post_process(f);
        self
    }

    fn expand(&self, template: &str, domain: &str, property: &str, range: &str, key: &str) -> String {
        let lang = self.language.as_deref().unwrap_or("");
        let sparql = template
            .replace("$domain", &format!("<{}>", domain))
            .replace("$property", &format!("<{}>", property))
            .replace("$range", &format!("<{}>", range))
            .replace("$lang", lang)
            .replace("$key", key);
        trace!(%sparql, "expanded query template");
        sparql
    }
}

impl DataSourceHandler for SparqlTemplateHandler {
    fn build_search_request(
        &self,
        domain: &str,
        property: &str,
        range: &str,
        key: &str,
    ) -> Result<RequestDescriptor> {
        let sparql = self.expand(&self.search_template, domain, property, range, key);
        Ok(self.builder.build(&sparql))
    }

    fn build_list_request(
        &self,
        domain: &str,
        property: &str,
        range: &str,
    ) -> Result<RequestDescriptor> {
        let sparql = self.expand(&self.list_template, domain, property, range, "");
        Ok(self.builder.build(&sparql))
    }

    fn supports_match(&self, _domain: &str, _property: &str, _range: &str) -> bool {
        self.match_enabled
    }
}
