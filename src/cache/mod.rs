//! Cache Module
//!
//! Session-scoped cache with TTL expiry, key namespacing and pattern
//! invalidation over a pluggable storage backend.

pub mod clock;
mod entry;
mod manager;
mod pattern;
pub mod registry;
mod stats;
mod storage;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use manager::{CacheManager, EntryInfo};
pub use pattern::KeyPattern;
pub use registry::{keys, CacheTtl, CachedDataset, TtlPolicy, TtlTier};
pub use stats::CacheStats;
pub use storage::{MemoryStorage, NullStorage, SessionStorage};

// == Public Constants ==
/// Namespace applied to every physical key this service writes
pub const DEFAULT_PREFIX: &str = "spd_cache_";
