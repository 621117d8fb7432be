//! Expiry Sweep Task
//!
//! Reads already drop stale entries lazily; this task reclaims space held by
//! entries nobody reads again.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheManager;

/// Spawns a task that sweeps expired entries once at startup and then every
/// `cleanup_interval_secs`.
///
/// Returns the JoinHandle so the caller can abort it on shutdown.
pub fn spawn_cleanup_task(
    cache: Arc<CacheManager>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting expiry sweep task with interval of {} seconds",
            cleanup_interval_secs
        );

        loop {
            let removed = cache.clear_expired();
            if removed > 0 {
                info!("Expiry sweep: removed {} stale entries", removed);
            } else {
                debug!("Expiry sweep: no stale entries found");
            }

            tokio::time::sleep(interval).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{ManualClock, MemoryStorage, DEFAULT_PREFIX};

    fn cache_at(clock: Arc<ManualClock>) -> (Arc<MemoryStorage>, Arc<CacheManager>) {
        let storage = Arc::new(MemoryStorage::new());
        let cache = Arc::new(CacheManager::new(storage.clone(), clock, DEFAULT_PREFIX));
        (storage, cache)
    }

    #[tokio::test]
    async fn test_startup_sweep_removes_stale_entries() {
        let clock = Arc::new(ManualClock::new(0));
        let (storage, cache) = cache_at(clock.clone());
        cache.set("stale", &1, 10);
        cache.set("fresh", &2, 10_000);
        clock.advance(11);

        let handle = spawn_cleanup_task(cache.clone(), 3600);
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(storage.len(), 1, "stale entry swept without being read");
        assert_eq!(cache.get::<i32>("fresh"), Some(2));

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_runs_every_interval() {
        let clock = Arc::new(ManualClock::new(0));
        let (storage, cache) = cache_at(clock.clone());

        let handle = spawn_cleanup_task(cache.clone(), 1);
        tokio::time::sleep(Duration::from_millis(100)).await;

        cache.set("short", &1, 5);
        clock.advance(6);
        assert_eq!(storage.len(), 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(storage.len(), 0);

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let (_, cache) = cache_at(Arc::new(ManualClock::new(0)));

        let handle = spawn_cleanup_task(cache, 1);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
