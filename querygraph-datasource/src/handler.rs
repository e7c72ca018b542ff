//! The data-source handler capability set.

use crate::error::{DataSourceError, Result};
use crate::request::RequestDescriptor;
use serde_json::Value;

/// Strategy object that builds search/list requests and parses their
/// results for one backend dialect.
///
/// Concrete handlers differ only in how they build request descriptors; the
/// record-extraction defaults below define the canonical result shape
/// (SPARQL JSON bindings with `label` and `uri`/`value` fields). Handlers
/// whose backend returns the same shape can have their results mixed safely
/// within one search or list operation.
pub trait DataSourceHandler: Send + Sync {
    /// Build the request whose execution returns candidate matches for the
    /// free-text `key`. `key` may be empty; empty-key semantics are
    /// handler-specific (some handlers treat it as "match all").
    fn build_search_request(
        &self,
        domain: &str,
        property: &str,
        range: &str,
        key: &str,
    ) -> Result<RequestDescriptor>;

    /// Build the request returning the full or bounded candidate set for an
    /// edge, used to populate a selectable list.
    fn build_list_request(
        &self,
        domain: &str,
        property: &str,
        range: &str,
    ) -> Result<RequestDescriptor>;

    /// Locate the sequence of candidate records inside a response body.
    ///
    /// The default understands the SPARQL JSON results shape
    /// (`results.bindings`) and falls back to a top-level array.
    fn extract_results(&self, body: &Value) -> Result<Vec<Value>> {
        if let Some(bindings) = body
            .get("results")
            .and_then(|r| r.get("bindings"))
            .and_then(Value::as_array)
        {
            return Ok(bindings.clone());
        }
        if let Some(records) = body.as_array() {
            return Ok(records.clone());
        }
        Err(DataSourceError::malformed_record(
            "response body contains no result list",
        ))
    }

    /// Pull the display label out of one record.
    fn extract_label(&self, record: &Value) -> Result<String> {
        default_extract_label(record)
    }

    /// Pull the canonical identifier out of one record: the conventional
    /// `uri` field, falling back to the conventional `value` field.
    fn extract_value(&self, record: &Value) -> Result<String> {
        default_extract_value(record)
    }

    /// Pull the inclusive start year out of one record, for date-range
    /// shaped sources. The default reads `record.start.year`; `None` on
    /// records without a lower boundary.
    fn extract_start(&self, record: &Value) -> Option<i32> {
        binding_year(record, "start")
    }

    /// Pull the inclusive stop year out of one record, the upper-boundary
    /// counterpart of [`extract_start`]. The default reads
    /// `record.stop.year`.
    ///
    /// [`extract_start`]: DataSourceHandler::extract_start
    fn extract_stop(&self, record: &Value) -> Option<i32> {
        binding_year(record, "stop")
    }

    /// Whether this handler enables in-place disambiguation for the edge.
    fn supports_match(&self, _domain: &str, _property: &str, _range: &str) -> bool {
        false
    }
}

/// Canonical label extraction, shared with handlers that override the trait
/// method but still want the default behavior as a fallback.
pub(crate) fn default_extract_label(record: &Value) -> Result<String> {
    binding_value(record, "label")
        .ok_or_else(|| DataSourceError::malformed_record("record lacks a 'label' field"))
}

/// Canonical value extraction: `uri` field first, then `value`.
pub(crate) fn default_extract_value(record: &Value) -> Result<String> {
    binding_value(record, "uri")
        .or_else(|| binding_value(record, "value"))
        .ok_or_else(|| {
            DataSourceError::malformed_record("record lacks both 'uri' and 'value' fields")
        })
}

/// Read `record.{field}.year` as a year number, accepting a bare number at
/// `record.{field}` for flat record shapes.
pub(crate) fn binding_year(record: &Value, field: &str) -> Option<i32> {
    let entry = record.get(field)?;
    entry
        .get("year")
        .and_then(Value::as_i64)
        .or_else(|| entry.as_i64())
        .map(|year| year as i32)
}

/// Read `record.{field}.value` as a string, accepting a bare string at
/// `record.{field}` for non-SPARQL record shapes.
fn binding_value(record: &Value, field: &str) -> Option<String> {
    let entry = record.get(field)?;
    entry
        .get("value")
        .and_then(Value::as_str)
        .or_else(|| entry.as_str())
        .map(str::to_string)
}
