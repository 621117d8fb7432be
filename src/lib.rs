//! Session Cache - read-through caching for a coaching dashboard
//!
//! Keeps dashboard datasets in a session-scoped store with tiered TTLs and
//! invalidates them whenever a write makes them stale.

pub mod api;
pub mod cache;
pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod remote;
pub mod tasks;

pub use api::{create_router, AppState};
pub use cache::CacheManager;
pub use config::Config;
pub use data::DataAccess;
pub use remote::{InMemoryRemote, RemoteStore};
pub use tasks::spawn_cleanup_task;
