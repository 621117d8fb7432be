//! Data Access Module
//!
//! Read paths check the session cache before asking the remote store and
//! write the result back. Write paths mutate the remote store and then
//! invalidate every key the mutation made stale.
//!
//! Each entity module owns both halves for its datasets so the key used to
//! populate and the key used to invalidate come from the same registry entry.

mod alerts;
mod check_ins;
mod clients;
mod coaches;
mod pricing;

use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheManager, CachedDataset};
use crate::remote::{RemoteResult, RemoteStore};

/// Cached front for the remote store.
///
/// Reads share `write_gate`; writes take it exclusively from the start of
/// the mutation until its invalidation has run. A read that fetched
/// pre-mutation data therefore always lands in the cache before the
/// invalidation that removes it, never after.
pub struct DataAccess {
    cache: Arc<CacheManager>,
    remote: Arc<dyn RemoteStore>,
    write_gate: RwLock<()>,
}

impl DataAccess {
    pub fn new(cache: Arc<CacheManager>, remote: Arc<dyn RemoteStore>) -> Self {
        Self {
            cache,
            remote,
            write_gate: RwLock::new(()),
        }
    }

    pub fn cache(&self) -> &Arc<CacheManager> {
        &self.cache
    }

    /// Drops every cached entry for this session, e.g. on logout.
    pub fn end_session(&self) -> usize {
        self.cache.clear_all()
    }

    /// Serves `dataset` from the cache, or fetches and caches it.
    ///
    /// `bypass_cache` skips the lookup but still refreshes the entry.
    /// Fetch errors propagate and leave the cache untouched.
    pub(crate) async fn read_through<D, F, Fut>(
        &self,
        dataset: D,
        bypass_cache: bool,
        fetch: F,
    ) -> RemoteResult<D::Value>
    where
        D: CachedDataset,
        F: FnOnce() -> Fut,
        Fut: Future<Output = RemoteResult<D::Value>>,
    {
        let _gate = self.write_gate.read().await;

        if !bypass_cache {
            if let Some(hit) = self.cache.fetch(&dataset) {
                return Ok(hit);
            }
        } else {
            debug!(key = %dataset.key(), "cache bypassed");
        }

        let value = fetch().await?;
        self.cache.store(&dataset, &value);
        Ok(value)
    }

    /// Runs `mutation`, then `invalidate` with its result, holding the gate.
    ///
    /// Nothing is invalidated when the mutation fails.
    pub(crate) async fn write_then_invalidate<T, Fut, I>(
        &self,
        mutation: Fut,
        invalidate: I,
    ) -> RemoteResult<T>
    where
        Fut: Future<Output = RemoteResult<T>>,
        I: FnOnce(&CacheManager, &T),
    {
        let _gate = self.write_gate.write().await;
        let result = mutation.await?;
        invalidate(&self.cache, &result);
        Ok(result)
    }
}
