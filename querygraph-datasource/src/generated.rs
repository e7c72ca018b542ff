//! Programmatically generated SPARQL handler.

use crate::config::{DataSourceConfig, ListOrder};
use crate::error::Result;
use crate::handler::DataSourceHandler;
use crate::request::{RequestBuilder, RequestDescriptor};
use crate::DEFAULT_SEARCH_PATH;
use tracing::trace;

/// Result limit applied to generated search queries.
pub const DEFAULT_SEARCH_LIMIT: usize = 50;

const RDFS_PREFIX: &str = "PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>";

/// Handler that generates its query text from the edge descriptor, a label
/// search path and the configured list ordering mode.
///
/// The generated queries select `?uri` and `?label` in the canonical result
/// shape the default extraction contract expects. When a language is
/// configured, matched labels are constrained to it; when absent, no
/// language filter is emitted.
pub struct GeneratedSparqlHandler {
    builder: RequestBuilder,
    language: Option<String>,
    search_path: String,
    list_order: ListOrder,
    limit: usize,
}

impl GeneratedSparqlHandler {
    /// Create a generated-query handler for an endpoint.
    ///
    /// The label search path and list ordering come from the configuration
    /// snapshot; the search path defaults to `rdfs:label`.
    pub fn new(endpoint: impl Into<String>, config: &DataSourceConfig) -> Result<Self> {
        Ok(Self {
            builder: RequestBuilder::new(endpoint, config)?,
            language: config.language.clone(),
            search_path: config
                .search_path
                .clone()
                .unwrap_or_else(|| DEFAULT_SEARCH_PATH.to_string()),
            list_order: config.list_order,
            limit: DEFAULT_SEARCH_LIMIT,
        })
    }

    /// Override the search result limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Install a hook rewriting the generated query text before URL
    /// embedding.
    pub fn with_post_process(
        mut self,
        f: impl Fn(String) -> String + Send + Sync + 'static,
    ) -> Self {
        self.builder = self.builder.with_post_process(f);
        self
    }

    /// Render the search path as a SPARQL property path: full IRIs get
    /// angle brackets, prefixed names pass through.
    fn path(&self) -> String {
        if self.search_path.starts_with("http://") || self.search_path.starts_with("https://") {
            format!("<{}>", self.search_path)
        } else {
            self.search_path.clone()
        }
    }

    /// The shared body triples: subject typing, edge property, label path.
    fn body(&self, domain: &str, property: &str, label_var: &str) -> String {
        format!(
            "?subject a <{}> . ?subject <{}> ?uri . ?uri {} ?{} .",
            domain,
            property,
            self.path(),
            label_var
        )
    }

    /// Language filter on the given label variable, empty when no language
    /// is configured.
    fn lang_filter(&self, label_var: &str) -> String {
        match &self.language {
            Some(lang) => format!(" FILTER(lang(?{}) = '{}')", label_var, lang),
            None => String::new(),
        }
    }
}

/// Escape a search key for embedding between double quotes.
fn escape_key(key: &str) -> String {
    key.replace('\\', "\\\\").replace('"', "\\\"")
}

impl DataSourceHandler for GeneratedSparqlHandler {
    fn build_search_request(
        &self,
        domain: &str,
        property: &str,
        _range: &str,
        key: &str,
    ) -> Result<RequestDescriptor> {
        let sparql = format!(
            "{} SELECT DISTINCT ?uri ?label WHERE {{ {} FILTER(CONTAINS(LCASE(?label), LCASE(\"{}\"))){} }} ORDER BY ?label LIMIT {}",
            RDFS_PREFIX,
            self.body(domain, property, "label"),
            escape_key(key),
            self.lang_filter("label"),
            self.limit
        );
        trace!(%sparql, "generated search query");
        Ok(self.builder.build(&sparql))
    }

    fn build_list_request(
        &self,
        domain: &str,
        property: &str,
        _range: &str,
    ) -> Result<RequestDescriptor> {
        let sparql = match self.list_order {
            ListOrder::Alphabetical => format!(
                "{} SELECT DISTINCT ?uri ?label WHERE {{ {}{} }} ORDER BY ?label",
                RDFS_PREFIX,
                self.body(domain, property, "label"),
                self.lang_filter("label")
            ),
            ListOrder::Count => format!(
                "{} SELECT ?uri ?label (COUNT(?subject) AS ?count) WHERE {{ {}{} }} GROUP BY ?uri ?label ORDER BY DESC(?count)",
                RDFS_PREFIX,
                self.body(domain, property, "label"),
                self.lang_filter("label")
            ),
            ListOrder::AlphabeticalWithCount => format!(
                "{} SELECT ?uri (CONCAT(STR(?itemLabel), \" (\", STR(COUNT(?subject)), \")\") AS ?label) WHERE {{ {}{} }} GROUP BY ?uri ?itemLabel ORDER BY ?itemLabel",
                RDFS_PREFIX,
                self.body(domain, property, "itemLabel"),
                self.lang_filter("itemLabel")
            ),
        };
        trace!(%sparql, "generated list query");
        Ok(self.builder.build(&sparql))
    }
}
