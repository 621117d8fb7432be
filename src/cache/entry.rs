//! Cache Entry Module
//!
//! Defines the envelope written to session storage for every cached payload.

use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// A cached payload together with its validity window.
///
/// Serialized as `{"data": .., "expiry": .., "timestamp": ..}`. Entries are
/// never mutated once written; a new `set` replaces the whole envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    /// The cached payload
    pub data: T,
    /// Expiration timestamp (Unix milliseconds)
    pub expiry: u64,
    /// Write timestamp (Unix milliseconds)
    pub timestamp: u64,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Wraps `data` so that it stays valid for `ttl_ms` after `now_ms`.
    ///
    /// # Arguments
    /// * `data` - The payload to store
    /// * `ttl_ms` - Time to live in milliseconds
    /// * `now_ms` - Current time in Unix milliseconds
    pub fn new(data: T, ttl_ms: u64, now_ms: u64) -> Self {
        Self {
            data,
            expiry: now_ms.saturating_add(ttl_ms),
            timestamp: now_ms,
        }
    }

    // == Is Expired ==
    /// Checks if the entry is stale at `now_ms`.
    ///
    /// The expiry millisecond itself is still valid; the entry goes stale
    /// strictly after it.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms > self.expiry
    }

    // == Time To Live ==
    /// Returns remaining validity in milliseconds, 0 once stale.
    pub fn ttl_remaining_ms(&self, now_ms: u64) -> u64 {
        self.expiry.saturating_sub(now_ms)
    }
}

/// Envelope header read without touching the payload.
///
/// Lets sweeps check expiry without knowing the payload type.
#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct EntryHeader {
    pub expiry: u64,
    pub timestamp: u64,
}

impl EntryHeader {
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms > self.expiry
    }
}
