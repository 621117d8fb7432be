//! Response DTOs for the dashboard API

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for GET /cache/stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            stats,
        }
    }
}

/// Response body for GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Cache backend in use
    pub backend: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(backend: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            backend: backend.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Response body for the sweep and logout endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClearedResponse {
    /// Entries removed
    pub removed: usize,
}

/// Response body for POST /clients/reassign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReassignResponse {
    /// Clients moved to the new coach
    pub moved: usize,
}
