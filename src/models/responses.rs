//! Response DTOs for the HTTP API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

/// Response body for GET /collections/:name
#[derive(Debug, Clone, Serialize)]
pub struct RowsResponse {
    pub collection: String,
    pub count: usize,
    pub rows: Vec<Value>,
}

impl RowsResponse {
    pub fn new(collection: impl Into<String>, rows: Vec<Value>) -> Self {
        Self {
            collection: collection.into(),
            count: rows.len(),
            rows,
        }
    }
}

/// Response body for DELETE /collections/:name
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// Number of rows removed
    pub deleted: usize,
}

impl DeleteResponse {
    pub fn new(collection: &str, deleted: usize) -> Self {
        Self {
            message: format!("Deleted {} row(s) from '{}'", deleted, collection),
            deleted,
        }
    }
}

/// Response body for cache maintenance endpoints
#[derive(Debug, Clone, Serialize)]
pub struct CacheActionResponse {
    pub message: String,
    /// Entries removed by the action
    pub removed: usize,
}

impl CacheActionResponse {
    pub fn new(message: impl Into<String>, removed: usize) -> Self {
        Self {
            message: message.into(),
            removed,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
