//! Cache Statistics Module
//!
//! Tracks cumulative cache counters and builds point-in-time snapshots.

use serde::Serialize;

// == Counters ==
/// Cumulative counters owned by the cache. Never reset by `clear()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Counters {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub deletes: u64,
}

impl Counters {
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_set(&mut self) {
        self.sets += 1;
    }

    pub fn record_delete(&mut self) {
        self.deletes += 1;
    }
}

// == Cache Stats ==
/// Snapshot of cache counters plus the live key set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of successful reads
    pub hits: u64,
    /// Number of reads that found nothing (absent or expired)
    pub misses: u64,
    /// Number of writes
    pub sets: u64,
    /// Number of entries removed explicitly
    pub deletes: u64,
    /// Current number of entries
    pub size: usize,
    /// hits / (hits + misses), rounded to 2 decimals
    pub hit_rate: f64,
    /// Live keys, sorted
    pub keys: Vec<String>,
}

impl CacheStats {
    // == Constructor ==
    /// Builds a snapshot from counters and the current key set.
    pub fn from_counters(counters: Counters, mut keys: Vec<String>) -> Self {
        keys.sort();
        Self {
            hits: counters.hits,
            misses: counters.misses,
            sets: counters.sets,
            deletes: counters.deletes,
            size: keys.len(),
            hit_rate: round2(hit_rate(counters.hits, counters.misses)),
            keys,
        }
    }
}

// == Hit Rate ==
/// Returns hits / (hits + misses), or 0.0 if no reads have happened.
pub fn hit_rate(hits: u64, misses: u64) -> f64 {
    let total = hits + misses;
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(hit_rate(0, 0), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        assert_eq!(hit_rate(1, 1), 0.5);
        assert_eq!(hit_rate(3, 0), 1.0);
        assert_eq!(hit_rate(0, 2), 0.0);
    }

    #[test]
    fn test_snapshot_rounds_hit_rate() {
        let mut counters = Counters::default();
        counters.record_hit();
        counters.record_miss();
        counters.record_miss();

        let stats = CacheStats::from_counters(counters, vec![]);
        assert_eq!(stats.hit_rate, 0.33);
    }

    #[test]
    fn test_snapshot_sorts_keys() {
        let stats = CacheStats::from_counters(
            Counters::default(),
            vec!["b".to_string(), "a".to_string()],
        );
        assert_eq!(stats.keys, vec!["a", "b"]);
        assert_eq!(stats.size, 2);
    }

    #[test]
    fn test_record_counters() {
        let mut counters = Counters::default();
        counters.record_set();
        counters.record_set();
        counters.record_delete();
        assert_eq!(counters.sets, 2);
        assert_eq!(counters.deletes, 1);
    }
}
