//! Data Core
//!
//! Entry point used by feature modules for every read and write.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::cache::{CacheStats, TtlCache};
use crate::config::Config;
use crate::error::{CoreError, Result};
use crate::retry::{execute_with_retry, RetryPolicy};
use crate::sanitize::sanitize;
use crate::store::{Filter, RowStore, StoreError, StoreResponse};
use crate::validation::{Schema, ValidationResult, Validator};

/// Read cache shared between the core, the HTTP layer and the sweep task.
pub type SharedCache = Arc<RwLock<TtlCache<Vec<Value>>>>;

// == Write Outcome ==
/// Result of a write that reached the validation stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WriteOutcome {
    /// The store accepted the write; rows as returned by the store.
    Applied { rows: Vec<Value> },
    /// Validation failed; nothing was sent to the store.
    Rejected { validation: ValidationResult },
}

impl WriteOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, WriteOutcome::Applied { .. })
    }
}

// == Data Core ==
#[derive(Clone)]
pub struct DataCore {
    store: Arc<dyn RowStore>,
    cache: SharedCache,
    retry: RetryPolicy,
    validator: Validator,
    /// Bumped on every invalidation, under the cache lock. A read only fills
    /// the cache if no invalidation happened while it was in flight.
    epoch: Arc<AtomicU64>,
}

impl DataCore {
    // == Constructor ==
    pub fn new(
        store: Arc<dyn RowStore>,
        cache: TtlCache<Vec<Value>>,
        retry: RetryPolicy,
        validator: Validator,
    ) -> Self {
        Self {
            store,
            cache: Arc::new(RwLock::new(cache)),
            retry,
            validator,
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Builds a core over `store` with cache TTL, retry and validation taken from `config`.
    pub fn from_config(config: &Config, store: Arc<dyn RowStore>) -> Self {
        Self::new(
            store,
            TtlCache::new(config.cache_ttl_ms),
            RetryPolicy::new(
                config.retry_max_attempts,
                Duration::from_millis(config.retry_base_delay_ms),
            ),
            Validator::new(config.validation_enabled, config.message_policy),
        )
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    // == Fetch ==
    /// Returns rows of `collection` matching `filter`, served from cache when fresh.
    pub async fn fetch(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>> {
        check_collection(collection)?;
        let key = cache_key(collection, filter);

        if let Some(rows) = self.cache.write().await.get(&key) {
            debug!(collection, key = %key, "serving rows from cache");
            return Ok(rows);
        }

        let epoch = self.epoch.load(Ordering::SeqCst);
        let rows = self.fetch_uncached(collection, filter).await?;

        let mut cache = self.cache.write().await;
        if self.epoch.load(Ordering::SeqCst) == epoch {
            cache.set(key, rows.clone(), None);
        } else {
            debug!(collection, key = %key, "cache invalidated during read; not caching");
        }
        Ok(rows)
    }

    /// Reads straight from the store without touching the cache.
    pub async fn fetch_uncached(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>> {
        check_collection(collection)?;
        self.remote(format!("Fetch {}", collection), || {
            self.store.select(collection, filter)
        })
        .await
    }

    // == Create ==
    /// Sanitizes and optionally validates `record`, drops cached reads of
    /// `collection`, then inserts it.
    pub async fn create(
        &self,
        collection: &str,
        record: &Value,
        schema: Option<&Schema>,
    ) -> Result<WriteOutcome> {
        check_collection(collection)?;
        let record = sanitize(record)?;
        if let Some(rejected) = self.check(&record, schema) {
            return Ok(rejected);
        }

        self.invalidate(collection).await;
        let rows = self
            .remote(format!("Create {}", collection), || {
                self.store.insert(collection, vec![record.clone()])
            })
            .await?;

        // Again, for reads that started while the insert was in flight.
        self.invalidate(collection).await;
        info!(collection, count = rows.len(), "record created");
        Ok(WriteOutcome::Applied { rows })
    }

    // == Update ==
    /// Sanitizes and optionally validates `patch`, drops cached reads of
    /// `collection`, then applies it to matching rows.
    pub async fn update(
        &self,
        collection: &str,
        filter: &Filter,
        patch: &Value,
        schema: Option<&Schema>,
    ) -> Result<WriteOutcome> {
        check_collection(collection)?;
        let patch = sanitize(patch)?;
        if let Some(rejected) = self.check(&patch, schema) {
            return Ok(rejected);
        }

        self.invalidate(collection).await;
        let rows = self
            .remote(format!("Update {}", collection), || {
                self.store.update(collection, filter, patch.clone())
            })
            .await?;

        self.invalidate(collection).await;
        info!(collection, count = rows.len(), "records updated");
        Ok(WriteOutcome::Applied { rows })
    }

    // == Delete ==
    /// Deletes matching rows and returns how many the store reported removed.
    pub async fn delete(&self, collection: &str, filter: &Filter) -> Result<usize> {
        check_collection(collection)?;
        self.invalidate(collection).await;
        let rows = self
            .remote(format!("Delete {}", collection), || {
                self.store.delete(collection, filter)
            })
            .await?;

        self.invalidate(collection).await;
        info!(collection, count = rows.len(), "records deleted");
        Ok(rows.len())
    }

    // == Validate ==
    pub fn validate(&self, data: &Value, schema: &Schema) -> ValidationResult {
        self.validator.validate(data, schema)
    }

    // == Cache Helpers ==
    /// Drops every cached read of `collection`. Returns the number of keys removed.
    pub async fn invalidate(&self, collection: &str) -> usize {
        self.invalidate_pattern(&regex::escape(collection)).await
    }

    /// Drops every cached key matching `pattern`. Returns the number of keys removed.
    pub async fn invalidate_pattern(&self, pattern: &str) -> usize {
        let mut cache = self.cache.write().await;
        self.epoch.fetch_add(1, Ordering::SeqCst);
        cache.invalidate_pattern(pattern)
    }

    /// Empties the cache. Returns the number of entries dropped.
    pub async fn clear_cache(&self) -> usize {
        let mut cache = self.cache.write().await;
        self.epoch.fetch_add(1, Ordering::SeqCst);
        let removed = cache.len();
        cache.clear();
        removed
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }

    fn check(&self, data: &Value, schema: Option<&Schema>) -> Option<WriteOutcome> {
        let result = self.validator.validate(data, schema?);
        if result.valid {
            None
        } else {
            debug!(errors = ?result.errors, "validation rejected write");
            Some(WriteOutcome::Rejected { validation: result })
        }
    }

    /// Runs one store call under the retry policy.
    ///
    /// Both `Err` replies and in-band `{error}` replies count as failures.
    async fn remote<F, Fut>(&self, label: String, mut call: F) -> Result<Vec<Value>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<StoreResponse, StoreError>>,
    {
        execute_with_retry(
            || {
                let pending = call();
                async move { pending.await?.into_result() }
            },
            &label,
            &self.retry,
        )
        .await
        .map_err(|e| CoreError::remote(label.as_str(), e))
    }
}

fn check_collection(collection: &str) -> Result<()> {
    if collection.trim().is_empty() {
        return Err(CoreError::InvalidRequest(
            "Collection name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn cache_key(collection: &str, filter: &Filter) -> String {
    format!("{}:{}", collection, filter.cache_key())
}
