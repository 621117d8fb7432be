//! Cache Manager Module
//!
//! Session cache built on a [`SessionStorage`] backend: prefixed keys, JSON
//! envelopes, lazy TTL expiry and explicit invalidation.
//!
//! The manager never returns an error. Any storage or serialization fault
//! degrades to a cache miss, so the worst it can cost a caller is a
//! redundant fetch.

use std::sync::Arc;

use regex::Regex;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::clock::{Clock, SystemClock};
use crate::cache::entry::{CacheEntry, EntryHeader};
use crate::cache::pattern::KeyPattern;
use crate::cache::registry::{CachedDataset, TtlPolicy};
use crate::cache::stats::{CacheStats, StatsRecorder};
use crate::cache::storage::{MemoryStorage, NullStorage, SessionStorage};
use crate::config::{Config, StorageBackend};

/// Diagnostics for a live entry.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct EntryInfo {
    /// Logical key
    pub key: String,
    /// Write time (Unix milliseconds)
    pub written_at: u64,
    /// Expiry time (Unix milliseconds)
    pub expires_at: u64,
    /// Milliseconds until the entry goes stale
    pub remaining_ms: u64,
}

// == Cache Manager ==
/// Session-scoped cache over a pluggable storage backend.
///
/// Holds no entry state of its own; everything lives in the backend under
/// `prefix + logical_key`. Construct one per session and share it.
pub struct CacheManager {
    storage: Arc<dyn SessionStorage>,
    clock: Arc<dyn Clock>,
    prefix: String,
    ttl: TtlPolicy,
    stats: StatsRecorder,
}

impl std::fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheManager")
            .field("prefix", &self.prefix)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl CacheManager {
    // == Constructor ==
    /// Creates a manager over `storage`, reading time from `clock`.
    ///
    /// # Arguments
    /// * `storage` - Backend holding the physical entries
    /// * `clock` - Time source used for expiry
    /// * `prefix` - Namespace prepended to every logical key
    pub fn new(
        storage: Arc<dyn SessionStorage>,
        clock: Arc<dyn Clock>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            clock,
            prefix: prefix.into(),
            ttl: TtlPolicy::default(),
            stats: StatsRecorder::default(),
        }
    }

    /// Overrides the tier durations used by [`CacheManager::store`].
    pub fn with_ttl_policy(mut self, ttl: TtlPolicy) -> Self {
        self.ttl = ttl;
        self
    }

    /// Builds the backend named by the configuration and a wall clock.
    pub fn from_config(config: &Config) -> Self {
        let storage: Arc<dyn SessionStorage> = match config.backend {
            StorageBackend::Session => match config.quota_bytes {
                Some(quota) => Arc::new(MemoryStorage::with_quota(quota)),
                None => Arc::new(MemoryStorage::new()),
            },
            StorageBackend::Disabled => Arc::new(NullStorage),
        };

        Self::new(storage, Arc::new(SystemClock), config.key_prefix.clone())
            .with_ttl_policy(config.ttl)
    }

    /// Namespace prepended to every logical key.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Tier durations in effect.
    pub fn ttl_policy(&self) -> TtlPolicy {
        self.ttl
    }

    fn physical_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Physical keys owned by this manager, paired with their logical names.
    fn owned_keys(&self) -> Vec<(String, String)> {
        self.storage
            .raw_keys()
            .into_iter()
            .filter_map(|physical| {
                let logical = physical.strip_prefix(self.prefix.as_str())?.to_string();
                Some((physical, logical))
            })
            .collect()
    }

    // == Get ==
    /// Returns the payload stored under `key` if it is still fresh.
    ///
    /// Stale, unparseable and wrongly shaped entries are deleted and reported
    /// as a miss.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let physical = self.physical_key(key);

        let Some(raw) = self.storage.raw_get(&physical) else {
            self.stats.record_miss();
            debug!(key, "cache miss");
            return None;
        };

        let entry = match serde_json::from_str::<CacheEntry<Value>>(&raw) {
            Ok(entry) => entry,
            Err(err) => {
                self.drop_corrupt(&physical, key, &err);
                self.stats.record_miss();
                return None;
            }
        };

        if entry.is_expired(self.clock.now_ms()) {
            self.storage.raw_remove(&physical);
            self.stats.record_expired(1);
            self.stats.record_miss();
            debug!(key, expiry = entry.expiry, "cache entry expired");
            return None;
        }

        match serde_json::from_value::<T>(entry.data) {
            Ok(data) => {
                self.stats.record_hit();
                debug!(key, "cache hit");
                Some(data)
            }
            Err(err) => {
                self.drop_corrupt(&physical, key, &err);
                self.stats.record_miss();
                None
            }
        }
    }

    fn drop_corrupt(&self, physical: &str, key: &str, err: &serde_json::Error) {
        warn!(key, error = %err, "discarding unreadable cache entry");
        self.storage.raw_remove(physical);
        self.stats.record_corrupt(1);
    }

    // == Set ==
    /// Stores `data` under `key` for `ttl_ms` milliseconds.
    ///
    /// Always replaces the whole entry. If the backend refuses the write the
    /// entry is simply not cached and expired entries are swept to free room
    /// for later writes.
    ///
    /// # Arguments
    /// * `key` - Logical key
    /// * `data` - Any serializable payload
    /// * `ttl_ms` - Time to live in milliseconds, must be positive
    pub fn set<T: Serialize>(&self, key: &str, data: &T, ttl_ms: u64) {
        if ttl_ms == 0 {
            warn!(key, "refusing to cache with a zero ttl");
            self.stats.record_write_failure();
            return;
        }

        let entry = CacheEntry::new(data, ttl_ms, self.clock.now_ms());
        let raw = match serde_json::to_string(&entry) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(key, error = %err, "failed to serialize cache entry");
                self.stats.record_write_failure();
                return;
            }
        };

        match self.storage.raw_set(&self.physical_key(key), raw) {
            Ok(()) => {
                self.stats.record_write();
                debug!(key, ttl_ms, "cache write");
            }
            Err(err) => {
                warn!(key, error = %err, "cache write failed, sweeping expired entries");
                self.stats.record_write_failure();
                self.clear_expired();
            }
        }
    }

    // == Invalidate ==
    /// Removes the entry for `key`. Missing keys are fine.
    pub fn invalidate(&self, key: &str) {
        let physical = self.physical_key(key);
        if self.storage.raw_get(&physical).is_some() {
            self.stats.record_invalidations(1);
        }
        self.storage.raw_remove(&physical);
        debug!(key, "cache invalidate");
    }

    /// Removes every entry whose logical key contains `pattern` literally.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate_pattern(&self, pattern: &str) -> usize {
        self.invalidate_where(&KeyPattern::from(pattern))
    }

    /// Removes every entry whose logical key matches `re`.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate_matching(&self, re: &Regex) -> usize {
        self.invalidate_where(&KeyPattern::Regex(re.clone()))
    }

    fn invalidate_where(&self, pattern: &KeyPattern) -> usize {
        let mut removed = 0;
        for (physical, logical) in self.owned_keys() {
            if pattern.matches(&logical) {
                self.storage.raw_remove(&physical);
                removed += 1;
            }
        }

        self.stats.record_invalidations(removed);
        debug!(?pattern, removed, "cache invalidate pattern");
        removed
    }

    // == Clear Expired ==
    /// Removes stale and unparseable entries under the prefix.
    ///
    /// Returns the number of entries removed.
    pub fn clear_expired(&self) -> usize {
        let now = self.clock.now_ms();
        let mut expired = 0;
        let mut corrupt = 0;

        for (physical, _) in self.owned_keys() {
            let Some(raw) = self.storage.raw_get(&physical) else {
                continue;
            };

            match serde_json::from_str::<EntryHeader>(&raw) {
                Ok(header) if !header.is_expired(now) => {}
                Ok(_) => {
                    self.storage.raw_remove(&physical);
                    expired += 1;
                }
                Err(_) => {
                    self.storage.raw_remove(&physical);
                    corrupt += 1;
                }
            }
        }

        self.stats.record_expired(expired);
        self.stats.record_corrupt(corrupt);
        if expired + corrupt > 0 {
            info!(expired, corrupt, "cache sweep removed entries");
        }
        expired + corrupt
    }

    // == Clear All ==
    /// Removes every entry under the prefix regardless of expiry.
    ///
    /// Keys outside the prefix are left alone. Returns the number removed.
    pub fn clear_all(&self) -> usize {
        let owned = self.owned_keys();
        for (physical, _) in &owned {
            self.storage.raw_remove(physical);
        }

        self.stats.record_invalidations(owned.len());
        info!(removed = owned.len(), "cache cleared");
        owned.len()
    }

    // == Inspect ==
    /// Reports timing for a fresh entry without counting a hit or miss.
    ///
    /// Stale and unparseable entries are removed, as with [`CacheManager::get`].
    pub fn inspect(&self, key: &str) -> Option<EntryInfo> {
        let physical = self.physical_key(key);
        let raw = self.storage.raw_get(&physical)?;

        let header = match serde_json::from_str::<EntryHeader>(&raw) {
            Ok(header) => header,
            Err(err) => {
                self.drop_corrupt(&physical, key, &err);
                return None;
            }
        };

        let now = self.clock.now_ms();
        if header.is_expired(now) {
            self.storage.raw_remove(&physical);
            self.stats.record_expired(1);
            return None;
        }

        Some(EntryInfo {
            key: key.to_string(),
            written_at: header.timestamp,
            expires_at: header.expiry,
            remaining_ms: header.expiry.saturating_sub(now),
        })
    }

    // == Length ==
    /// Number of physical entries under the prefix, fresh or not.
    pub fn len(&self) -> usize {
        self.owned_keys().len()
    }

    /// Returns true if nothing is stored under the prefix.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.len())
    }

    // == Typed Access ==
    /// Reads a registered dataset.
    pub fn fetch<D: CachedDataset>(&self, dataset: &D) -> Option<D::Value> {
        self.get(&dataset.key())
    }

    /// Writes a registered dataset with its tier's TTL.
    pub fn store<D: CachedDataset>(&self, dataset: &D, value: &D::Value) {
        self.set(&dataset.key(), value, self.ttl.ms(D::TIER))
    }

    /// Invalidates a registered dataset.
    pub fn evict<D: CachedDataset>(&self, dataset: &D) {
        self.invalidate(&dataset.key())
    }
}
