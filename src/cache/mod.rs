//! Cache Module
//!
//! Provides an in-memory key-value cache with per-entry TTL expiration.

mod clock;
mod entry;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use stats::{hit_rate, CacheStats, Counters};
pub use store::TtlCache;

// == Public Constants ==
/// Default entry lifetime: 5 minutes
pub const DEFAULT_TTL_MS: i64 = 5 * 60 * 1000;
