//! TTL Cache Module
//!
//! Expiring key-value store with hit/miss accounting and pattern invalidation.

use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;
use tracing::{debug, trace};

use crate::cache::{CacheEntry, CacheStats, Clock, Counters, SystemClock};

// == TTL Cache ==
/// Generic expiring key-value store.
///
/// Expired entries are dropped lazily on `get`/`has`, or eagerly by `cleanup`.
#[derive(Debug)]
pub struct TtlCache<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Cumulative counters
    counters: Counters,
    /// TTL in milliseconds applied when `set` gets no explicit TTL
    default_ttl_ms: i64,
    /// Time source
    clock: Arc<dyn Clock>,
}

impl<V: Clone> TtlCache<V> {
    // == Constructor ==
    /// Creates a cache using the system clock.
    ///
    /// # Arguments
    /// * `default_ttl_ms` - TTL for entries stored without an explicit one (`<= 0` = never expire)
    pub fn new(default_ttl_ms: i64) -> Self {
        Self::with_clock(default_ttl_ms, Arc::new(SystemClock))
    }

    /// Creates a cache driven by the given clock.
    pub fn with_clock(default_ttl_ms: i64, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            counters: Counters::default(),
            default_ttl_ms,
            clock,
        }
    }

    // == Set ==
    /// Stores a value, fully replacing any previous entry for `key`.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl_ms` - Optional TTL in milliseconds (uses the default if None)
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl_ms: Option<i64>) {
        let ttl_ms = ttl_ms.unwrap_or(self.default_ttl_ms);
        let entry = CacheEntry::new(value, self.clock.now_ms(), ttl_ms);
        self.entries.insert(key.into(), entry);
        self.counters.record_set();
    }

    // == Get ==
    /// Returns the value for `key` if present and live.
    ///
    /// Counts a hit or a miss. An expired entry is evicted before returning None.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = self.clock.now_ms();
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => {
                self.counters.record_hit();
                trace!(key, "cache hit");
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries.remove(key);
            debug!(key, "cache entry expired");
        } else {
            trace!(key, "cache miss");
        }
        self.counters.record_miss();
        None
    }

    // == Has ==
    /// Existence check that behaves exactly like `get(key).is_some()`.
    ///
    /// Touches the hit/miss counters and may evict. Use [`peek`](Self::peek)
    /// for a check without side effects.
    pub fn has(&mut self, key: &str) -> bool {
        self.get(key).is_some()
    }

    // == Peek ==
    /// Returns true if `key` holds a live entry. No counters, no eviction.
    pub fn peek(&self, key: &str) -> bool {
        let now = self.clock.now_ms();
        self.entries
            .get(key)
            .map(|entry| !entry.is_expired(now))
            .unwrap_or(false)
    }

    // == Remove ==
    /// Removes an entry. Returns whether anything was removed.
    pub fn remove(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.counters.record_delete();
            true
        } else {
            false
        }
    }

    // == Clear ==
    /// Drops every entry. Counters are cumulative and survive.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // == Invalidate Pattern ==
    /// Removes every key matching `pattern` and returns how many were removed.
    ///
    /// The pattern is a regular expression searched anywhere in the key, so a
    /// plain word behaves as a substring match. A pattern that fails to
    /// compile is matched as a literal substring.
    pub fn invalidate_pattern(&mut self, pattern: &str) -> usize {
        let regex = Regex::new(pattern).ok();
        let matches = |key: &str| match &regex {
            Some(re) => re.is_match(key),
            None => key.contains(pattern),
        };

        let matched: Vec<String> = self
            .entries
            .keys()
            .filter(|key| matches(key.as_str()))
            .cloned()
            .collect();

        for key in &matched {
            self.entries.remove(key);
            self.counters.record_delete();
        }

        if !matched.is_empty() {
            debug!(pattern, removed = matched.len(), "invalidated cache entries");
        }
        matched.len()
    }

    // == Stats ==
    /// Returns a snapshot of the counters and live keys.
    ///
    /// Keys of expired-but-not-yet-evicted entries are left out.
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now_ms();
        let keys = self
            .entries
            .iter()
            .filter(|(_, entry)| !entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();
        CacheStats::from_counters(self.counters, keys)
    }

    // == Cleanup ==
    /// Removes all expired entries. Returns the number removed.
    pub fn cleanup(&mut self) -> usize {
        let now = self.clock.now_ms();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before - self.entries.len()
    }

    // == Length ==
    /// Returns the number of stored entries, expired ones included until swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;

    fn cache_with_clock(default_ttl_ms: i64) -> (TtlCache<String>, ManualClock) {
        let clock = ManualClock::new(1_000_000);
        let cache = TtlCache::with_clock(default_ttl_ms, Arc::new(clock.clone()));
        (cache, clock)
    }

    #[test]
    fn test_set_and_get() {
        let (mut cache, _) = cache_with_clock(300_000);

        cache.set("key1", "value1".to_string(), None);
        assert_eq!(cache.get("key1"), Some("value1".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_get_missing_is_none() {
        let (mut cache, _) = cache_with_clock(300_000);

        assert_eq!(cache.get("nonexistent"), None);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_overwrite_replaces_entry() {
        let (mut cache, clock) = cache_with_clock(300_000);

        cache.set("key1", "value1".to_string(), Some(100));
        clock.advance(80);
        cache.set("key1", "value2".to_string(), Some(100));
        clock.advance(80);

        // The second write restarted the lifetime.
        assert_eq!(cache.get("key1"), Some("value2".to_string()));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().sets, 2);
    }

    #[test]
    fn test_expiry_evicts_lazily() {
        let (mut cache, clock) = cache_with_clock(300_000);

        cache.set("k", "v".to_string(), Some(1_000));
        assert_eq!(cache.get("k"), Some("v".to_string()));

        clock.advance(1_001);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("k"), None);
        assert_eq!(cache.len(), 0);
        assert!(!cache.stats().keys.contains(&"k".to_string()));
    }

    #[test]
    fn test_default_ttl_applies() {
        let (mut cache, clock) = cache_with_clock(500);

        cache.set("k", "v".to_string(), None);
        clock.advance(501);
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_zero_ttl_never_expires() {
        let (mut cache, clock) = cache_with_clock(500);

        cache.set("forever", "v".to_string(), Some(0));
        clock.advance(10 * 365 * 24 * 3_600_000);
        assert_eq!(cache.get("forever"), Some("v".to_string()));
    }

    #[test]
    fn test_has_mutates_counters() {
        let (mut cache, _) = cache_with_clock(300_000);

        cache.set("k", "v".to_string(), None);
        assert!(cache.has("k"));
        assert!(!cache.has("missing"));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_peek_is_side_effect_free() {
        let (mut cache, clock) = cache_with_clock(300_000);

        cache.set("k", "v".to_string(), Some(10));
        assert!(cache.peek("k"));
        assert!(!cache.peek("missing"));

        clock.advance(11);
        assert!(!cache.peek("k"));
        // Expired entry still stored: peek never evicts.
        assert_eq!(cache.len(), 1);

        let stats = cache.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
    }

    #[test]
    fn test_remove() {
        let (mut cache, _) = cache_with_clock(300_000);

        cache.set("k", "v".to_string(), None);
        assert!(cache.remove("k"));
        assert!(!cache.remove("k"));
        assert_eq!(cache.stats().deletes, 1);
    }

    #[test]
    fn test_clear_keeps_counters() {
        let (mut cache, _) = cache_with_clock(300_000);

        cache.set("a", "1".to_string(), None);
        cache.set("b", "2".to_string(), None);
        cache.get("a");
        cache.clear();

        let stats = cache.stats();
        assert_eq!(stats.size, 0);
        assert_eq!(stats.sets, 2);
        assert_eq!(stats.hits, 1);
    }

    #[test]
    fn test_invalidate_pattern_substring() {
        let (mut cache, _) = cache_with_clock(300_000);

        cache.set("users:all", "1".to_string(), None);
        cache.set("users:active", "2".to_string(), None);
        cache.set("orders:all", "3".to_string(), None);

        assert_eq!(cache.invalidate_pattern("users"), 2);
        assert_eq!(cache.get("orders:all"), Some("3".to_string()));
        assert_eq!(cache.get("users:all"), None);
        assert_eq!(cache.stats().keys, vec!["orders:all"]);
    }

    #[test]
    fn test_invalidate_pattern_regex() {
        let (mut cache, _) = cache_with_clock(300_000);

        cache.set("faltas:2024", "1".to_string(), None);
        cache.set("quebras:2024", "2".to_string(), None);
        cache.set("faltas_resumo", "3".to_string(), None);

        assert_eq!(cache.invalidate_pattern("^faltas:"), 1);
        assert!(cache.peek("faltas_resumo"));
    }

    #[test]
    fn test_invalidate_pattern_invalid_regex_is_literal() {
        let (mut cache, _) = cache_with_clock(300_000);

        cache.set("weird(key", "1".to_string(), None);
        cache.set("plain", "2".to_string(), None);

        assert_eq!(cache.invalidate_pattern("weird("), 1);
        assert!(cache.peek("plain"));
    }

    #[test]
    fn test_cleanup_removes_only_expired() {
        let (mut cache, clock) = cache_with_clock(300_000);

        cache.set("short", "1".to_string(), Some(100));
        cache.set("long", "2".to_string(), Some(10_000));
        cache.set("forever", "3".to_string(), Some(0));

        clock.advance(101);
        assert_eq!(cache.cleanup(), 1);
        assert_eq!(cache.len(), 2);
        assert!(cache.peek("long"));
    }

    #[test]
    fn test_stats_hit_rate() {
        let (mut cache, _) = cache_with_clock(300_000);

        cache.set("k", "v".to_string(), None);
        cache.get("k");
        cache.get("k");
        cache.get("missing");

        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hit_rate, 0.67);
    }
}
