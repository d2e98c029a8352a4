//! In-Memory Row Store
//!
//! Process-local [`RowStore`] used by the server binary and tests. Rows get an
//! auto-incrementing numeric `id` when inserted without one.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::debug;

use crate::store::{Filter, RowStore, StoreError, StoreResponse};

#[derive(Debug, Default)]
struct Collection {
    rows: Vec<Value>,
    next_id: u64,
}

#[derive(Debug, Default)]
pub struct MemoryRowStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryRowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently stored in `collection`.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, |c| c.rows.len())
    }
}

fn as_object(value: Value) -> Result<Map<String, Value>, StoreError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Backend(format!(
            "rows must be JSON objects, got {}",
            other
        ))),
    }
}

#[async_trait]
impl RowStore for MemoryRowStore {
    async fn select(&self, collection: &str, filter: &Filter) -> Result<StoreResponse, StoreError> {
        let guard = self.collections.read().await;
        let rows: Vec<Value> = guard
            .get(collection)
            .map(|c| {
                c.rows
                    .iter()
                    .filter(|row| filter.matches(row))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(StoreResponse::ok(filter.shape(rows)))
    }

    async fn insert(
        &self,
        collection: &str,
        rows: Vec<Value>,
    ) -> Result<StoreResponse, StoreError> {
        // Reject the whole batch before touching the collection.
        let maps = rows
            .into_iter()
            .map(as_object)
            .collect::<Result<Vec<_>, _>>()?;

        let mut guard = self.collections.write().await;
        let table = guard.entry(collection.to_string()).or_default();

        let mut inserted = Vec::with_capacity(maps.len());
        for mut map in maps {
            match map.get("id").and_then(Value::as_u64) {
                Some(id) => table.next_id = table.next_id.max(id),
                None => {
                    table.next_id += 1;
                    map.insert("id".to_string(), Value::from(table.next_id));
                }
            }
            inserted.push(Value::Object(map));
        }

        table.rows.extend(inserted.iter().cloned());
        debug!(collection, count = inserted.len(), "rows inserted");
        Ok(StoreResponse::ok(inserted))
    }

    async fn update(
        &self,
        collection: &str,
        filter: &Filter,
        patch: Value,
    ) -> Result<StoreResponse, StoreError> {
        let patch = as_object(patch)?;
        let mut guard = self.collections.write().await;

        let mut updated = Vec::new();
        if let Some(table) = guard.get_mut(collection) {
            for row in table.rows.iter_mut().filter(|row| filter.matches(row)) {
                if let Value::Object(fields) = &mut *row {
                    for (key, value) in &patch {
                        fields.insert(key.clone(), value.clone());
                    }
                }
                updated.push(row.clone());
            }
        }
        Ok(StoreResponse::ok(updated))
    }

    async fn delete(&self, collection: &str, filter: &Filter) -> Result<StoreResponse, StoreError> {
        let mut guard = self.collections.write().await;

        let removed = match guard.get_mut(collection) {
            Some(table) => {
                let (gone, kept): (Vec<Value>, Vec<Value>) =
                    table.rows.drain(..).partition(|row| filter.matches(row));
                table.rows = kept;
                gone
            }
            None => Vec::new(),
        };
        Ok(StoreResponse::ok(removed))
    }
}
