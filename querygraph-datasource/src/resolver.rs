//! Handler resolution.

use crate::error::Result;
use crate::handler::DataSourceHandler;
use crate::request::RequestDescriptor;
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::sync::Arc;
use tracing::trace;

/// Which component of the edge descriptor keys the dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchKey {
    /// Dispatch on the range IRI.
    Range,
    /// Dispatch on the property IRI.
    Property,
}

/// Dispatch table selecting a handler for an edge, with a default fallback.
///
/// Built once at configuration time and read-only afterward. Resolution
/// never fails: a dispatch key absent from the table is not an error, it is
/// the fallback path to the default handler.
///
/// All handler operations are forwarded to the resolved handler, so callers
/// can treat the resolver itself as the single entry point for an edge.
pub struct HandlerResolver {
    key: DispatchKey,
    table: FxHashMap<String, Arc<dyn DataSourceHandler>>,
    default_handler: Arc<dyn DataSourceHandler>,
}

impl HandlerResolver {
    /// Create a range-keyed resolver around a default handler.
    pub fn by_range(default_handler: Arc<dyn DataSourceHandler>) -> Self {
        Self::new(DispatchKey::Range, default_handler)
    }

    /// Create a property-keyed resolver around a default handler.
    pub fn by_property(default_handler: Arc<dyn DataSourceHandler>) -> Self {
        Self::new(DispatchKey::Property, default_handler)
    }

    fn new(key: DispatchKey, default_handler: Arc<dyn DataSourceHandler>) -> Self {
        Self {
            key,
            table: FxHashMap::default(),
            default_handler,
        }
    }

    /// Map a dispatch key to a handler.
    pub fn with_handler(
        mut self,
        key: impl Into<String>,
        handler: Arc<dyn DataSourceHandler>,
    ) -> Self {
        self.table.insert(key.into(), handler);
        self
    }

    /// The resolver's dispatch mode.
    pub fn dispatch_key(&self) -> DispatchKey {
        self.key
    }

    /// Resolve the handler for an edge. Never fails.
    pub fn resolve(
        &self,
        _domain: &str,
        property: &str,
        range: &str,
    ) -> &Arc<dyn DataSourceHandler> {
        let key = match self.key {
            DispatchKey::Range => range,
            DispatchKey::Property => property,
        };
        match self.table.get(key) {
            Some(handler) => handler,
            None => {
                trace!(%key, "no mapped handler, using default");
                &self.default_handler
            }
        }
    }

    /// Build a search request through the resolved handler.
    pub fn build_search_request(
        &self,
        domain: &str,
        property: &str,
        range: &str,
        key: &str,
    ) -> Result<RequestDescriptor> {
        self.resolve(domain, property, range)
            .build_search_request(domain, property, range, key)
    }

    /// Build a list request through the resolved handler.
    pub fn build_list_request(
        &self,
        domain: &str,
        property: &str,
        range: &str,
    ) -> Result<RequestDescriptor> {
        self.resolve(domain, property, range)
            .build_list_request(domain, property, range)
    }

    /// Extract result records through the resolved handler.
    pub fn extract_results(
        &self,
        domain: &str,
        property: &str,
        range: &str,
        body: &Value,
    ) -> Result<Vec<Value>> {
        self.resolve(domain, property, range).extract_results(body)
    }

    /// Extract a record's label through the resolved handler.
    pub fn extract_label(
        &self,
        domain: &str,
        property: &str,
        range: &str,
        record: &Value,
    ) -> Result<String> {
        self.resolve(domain, property, range).extract_label(record)
    }

    /// Extract a record's canonical value through the resolved handler.
    pub fn extract_value(
        &self,
        domain: &str,
        property: &str,
        range: &str,
        record: &Value,
    ) -> Result<String> {
        self.resolve(domain, property, range).extract_value(record)
    }

    /// Extract a record's start year through the resolved handler.
    pub fn extract_start(
        &self,
        domain: &str,
        property: &str,
        range: &str,
        record: &Value,
    ) -> Option<i32> {
        self.resolve(domain, property, range).extract_start(record)
    }

    /// Extract a record's stop year through the resolved handler.
    pub fn extract_stop(
        &self,
        domain: &str,
        property: &str,
        range: &str,
        record: &Value,
    ) -> Option<i32> {
        self.resolve(domain, property, range).extract_stop(record)
    }

    /// Whether the resolved handler enables in-place disambiguation.
    pub fn supports_match(&self, domain: &str, property: &str, range: &str) -> bool {
        self.resolve(domain, property, range)
            .supports_match(domain, property, range)
    }
}

impl std::fmt::Debug for HandlerResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerResolver")
            .field("key", &self.key)
            .field("mapped", &self.table.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;

    /// Fixture handler identified by a tag, so tests can tell which handler
    /// the resolver picked.
    struct Tagged(&'static str);

    impl DataSourceHandler for Tagged {
        fn build_search_request(
            &self,
            _domain: &str,
            _property: &str,
            _range: &str,
            key: &str,
        ) -> Result<RequestDescriptor> {
            Ok(RequestDescriptor {
                method: "GET".to_string(),
                url: format!("https://{}.example.org/?q={}", self.0, key),
                headers: Default::default(),
                mode: None,
                credentials: None,
                cache: None,
            })
        }

        fn build_list_request(
            &self,
            domain: &str,
            property: &str,
            range: &str,
        ) -> Result<RequestDescriptor> {
            self.build_search_request(domain, property, range, "")
        }
    }

    #[test]
    fn test_empty_table_falls_back_to_default() {
        let resolver = HandlerResolver::by_range(Arc::new(Tagged("default")));
        let request = resolver
            .build_search_request("d", "p", "http://example.org/Person", "x")
            .unwrap();
        assert!(request.url.contains("default.example.org"));
    }

    #[test]
    fn test_range_dispatch() {
        let resolver = HandlerResolver::by_range(Arc::new(Tagged("default")))
            .with_handler("http://example.org/Place", Arc::new(Tagged("place")));

        let mapped = resolver
            .build_search_request("d", "p", "http://example.org/Place", "x")
            .unwrap();
        assert!(mapped.url.contains("place.example.org"));

        let unmapped = resolver
            .build_search_request("d", "p", "http://example.org/Unknown", "x")
            .unwrap();
        assert!(unmapped.url.contains("default.example.org"));
    }

    #[test]
    fn test_property_dispatch_ignores_range() {
        let resolver = HandlerResolver::by_property(Arc::new(Tagged("default")))
            .with_handler("http://example.org/bornIn", Arc::new(Tagged("born")));

        let mapped = resolver
            .build_list_request("d", "http://example.org/bornIn", "http://example.org/Place")
            .unwrap();
        assert!(mapped.url.contains("born.example.org"));

        // Same range, different property: falls through to the default.
        let unmapped = resolver
            .build_list_request("d", "http://example.org/diedIn", "http://example.org/Place")
            .unwrap();
        assert!(unmapped.url.contains("default.example.org"));
    }

    #[test]
    fn test_supports_match_forwarding() {
        struct Matching;
        impl DataSourceHandler for Matching {
            fn build_search_request(
                &self,
                _: &str,
                _: &str,
                _: &str,
                _: &str,
            ) -> Result<RequestDescriptor> {
                unimplemented!()
            }
            fn build_list_request(&self, _: &str, _: &str, _: &str) -> Result<RequestDescriptor> {
                unimplemented!()
            }
            fn supports_match(&self, _: &str, _: &str, _: &str) -> bool {
                true
            }
        }

        let resolver = HandlerResolver::by_range(Arc::new(Tagged("default")))
            .with_handler("http://example.org/Place", Arc::new(Matching));
        assert!(resolver.supports_match("d", "p", "http://example.org/Place"));
        assert!(!resolver.supports_match("d", "p", "http://example.org/Person"));
    }
}
