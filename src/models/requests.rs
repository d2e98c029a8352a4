//! Request DTOs for the HTTP API
//!
//! Defines the structure of incoming HTTP request bodies.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use serde_json::Value;

use crate::error::Result;
use crate::store::Filter;
use crate::validation::{Schema, SchemaSpec};

/// Query parameters that shape a read rather than filter it.
const RESERVED_PARAMS: &[&str] = &["order", "desc", "limit"];

/// Request body for POST /collections/:name
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRequest {
    /// The row to insert
    pub record: Value,
    /// Optional rules checked before the insert
    #[serde(default)]
    pub schema: Option<SchemaSpec>,
}

/// Request body for PATCH /collections/:name
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRequest {
    /// column → value equality conditions selecting the rows
    #[serde(default)]
    pub filter: BTreeMap<String, Value>,
    /// Fields to overwrite
    pub patch: Value,
    #[serde(default)]
    pub schema: Option<SchemaSpec>,
}

impl UpdateRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.filter.is_empty() {
            return Some("Update requires at least one filter condition".to_string());
        }
        if !self.patch.is_object() {
            return Some("Patch must be a JSON object".to_string());
        }
        None
    }

    pub fn to_filter(&self) -> Filter {
        Filter {
            eq: self.filter.clone(),
            ..Filter::all()
        }
    }
}

/// Request body for POST /validate
#[derive(Debug, Clone, Deserialize)]
pub struct ValidateRequest {
    pub data: Value,
    pub schema: SchemaSpec,
}

/// Request body for POST /cache/invalidate
#[derive(Debug, Clone, Deserialize)]
pub struct InvalidateRequest {
    /// Regular expression (or plain substring) matched against cache keys
    pub pattern: String,
}

/// Compiles an optional schema spec.
pub fn compile_schema(spec: Option<&SchemaSpec>) -> Result<Option<Schema>> {
    spec.map(SchemaSpec::compile).transpose()
}

/// Builds a filter from query parameters.
///
/// Every parameter is an equality condition except `order` (column to sort
/// by), `desc` (any value flips the order) and `limit`.
pub fn filter_from_query(params: &HashMap<String, String>) -> Filter {
    let mut filter = Filter::all();
    for (key, value) in params {
        if !RESERVED_PARAMS.contains(&key.as_str()) {
            filter.eq.insert(key.clone(), Value::String(value.clone()));
        }
    }
    if let Some(column) = params.get("order") {
        filter = filter.order(column.as_str(), !params.contains_key("desc"));
    }
    if let Some(limit) = params.get("limit").and_then(|l| l.parse().ok()) {
        filter = filter.limit(limit);
    }
    filter
}
