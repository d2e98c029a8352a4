//! Row Store Module
//!
//! The persistence seam: named collections of JSON rows with
//! select/insert/update/delete. Remote backends and the in-memory store
//! implement the same trait.

mod filter;
mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use filter::Filter;
pub use memory::MemoryRowStore;

// == Store Error ==
/// Failure raised by a row-store client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("{0}")]
    Backend(String),
}

// == Store Response ==
/// `{data, error}` shaped reply. A backend may report failure here instead
/// of returning `Err`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreResponse {
    #[serde(default)]
    pub data: Vec<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl StoreResponse {
    pub fn ok(data: Vec<Value>) -> Self {
        Self { data, error: None }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            data: Vec::new(),
            error: Some(message.into()),
        }
    }

    /// Folds the in-band `error` field into a `Result`.
    pub fn into_result(self) -> Result<Vec<Value>, StoreError> {
        match self.error {
            Some(message) => Err(StoreError::Backend(message)),
            None => Ok(self.data),
        }
    }
}

// == Row Store Trait ==
#[async_trait]
pub trait RowStore: Send + Sync + 'static {
    async fn select(&self, collection: &str, filter: &Filter) -> Result<StoreResponse, StoreError>;

    /// Returns the inserted rows as stored.
    async fn insert(&self, collection: &str, rows: Vec<Value>)
        -> Result<StoreResponse, StoreError>;

    /// Merges `patch` into every matching row and returns the updated rows.
    async fn update(
        &self,
        collection: &str,
        filter: &Filter,
        patch: Value,
    ) -> Result<StoreResponse, StoreError>;

    async fn delete(&self, collection: &str, filter: &Filter) -> Result<StoreResponse, StoreError>;
}
