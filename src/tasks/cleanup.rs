//! TTL Cleanup Task
//!
//! Background task that periodically sweeps expired cache entries. Reads
//! already evict lazily; the sweep reclaims memory for keys nobody reads again.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::TtlCache;

/// Spawns a background task that periodically removes expired cache entries.
///
/// Returns `None` when `cleanup_interval_secs` is 0, leaving eviction fully lazy.
///
/// # Arguments
/// * `cache` - Shared reference to the cache
/// * `cleanup_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort it during
/// graceful shutdown.
pub fn spawn_cleanup_task<V>(
    cache: Arc<RwLock<TtlCache<V>>>,
    cleanup_interval_secs: u64,
) -> Option<JoinHandle<()>>
where
    V: Clone + Send + Sync + 'static,
{
    if cleanup_interval_secs == 0 {
        info!("Periodic cache sweep disabled; relying on lazy eviction");
        return None;
    }
    let interval = Duration::from_secs(cleanup_interval_secs);

    Some(tokio::spawn(async move {
        info!(
            "Starting cache sweep task with interval of {} seconds",
            cleanup_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut cache_guard = cache.write().await;
                cache_guard.cleanup()
            };

            if removed > 0 {
                info!("Cache sweep: removed {} expired entries", removed);
            } else {
                debug!("Cache sweep: no expired entries found");
            }
        }
    }))
}
