//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

// == Cache Entry ==
/// A stored value together with the time it was written and its lifetime.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Write timestamp (Unix milliseconds)
    pub stored_at: i64,
    /// Lifetime in milliseconds, `<= 0` = never expires
    pub ttl_ms: i64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry stamped at `now_ms`.
    pub fn new(value: V, now_ms: i64, ttl_ms: i64) -> Self {
        Self {
            value,
            stored_at: now_ms,
            ttl_ms,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry is stale at `now_ms`.
    ///
    /// An entry expires once strictly more than `ttl_ms` has elapsed since it
    /// was stored. Entries with a non-positive TTL never expire.
    pub fn is_expired(&self, now_ms: i64) -> bool {
        self.ttl_ms > 0 && now_ms - self.stored_at > self.ttl_ms
    }
}
