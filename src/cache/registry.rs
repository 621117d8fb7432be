//! Cache key and TTL registry.
//!
//! Every logical key the service uses is built here and nowhere else, so a
//! populating call site and its invalidating call site cannot drift apart.
//! Each dataset also pins the payload type stored under its key.

use serde::{de::DeserializeOwned, Serialize};

use crate::models::{Alert, CheckIn, Client, ClientSummary, Coach, CoachStats, Id, PricingTier};

// == TTL Tiers ==
/// Default tier durations in milliseconds.
pub struct CacheTtl;

impl CacheTtl {
    /// Fast-changing operational data
    pub const SHORT: u64 = 2 * 60 * 1000;
    /// Moderately stable catalogs
    pub const MEDIUM: u64 = 5 * 60 * 1000;
    /// Rarely changing reference data
    pub const LONG: u64 = 10 * 60 * 1000;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlTier {
    Short,
    Medium,
    Long,
}

/// Concrete durations for each tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    pub short_ms: u64,
    pub medium_ms: u64,
    pub long_ms: u64,
}

impl TtlPolicy {
    pub fn ms(&self, tier: TtlTier) -> u64 {
        match tier {
            TtlTier::Short => self.short_ms,
            TtlTier::Medium => self.medium_ms,
            TtlTier::Long => self.long_ms,
        }
    }
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            short_ms: CacheTtl::SHORT,
            medium_ms: CacheTtl::MEDIUM,
            long_ms: CacheTtl::LONG,
        }
    }
}

// == Keys ==
/// Logical key names and factories.
pub mod keys {
    use super::Id;

    pub const ALL_COACHES: &str = "all_coaches";
    pub const ALL_CLIENTS: &str = "all_clients";
    pub const ALL_CLIENTS_SUMMARY: &str = "all_clients_summary";
    pub const ACTIVE_ALERTS: &str = "active_alerts";
    pub const PRICING_TIERS: &str = "pricing_tiers";

    pub const COACH_CLIENTS: &str = "coach_clients";
    pub const COACH_STATS: &str = "coach_stats";
    pub const CLIENT_CHECK_INS: &str = "client_check_ins";

    /// `base_id`, the shape of every parametrized key.
    pub fn parametrized(base: &str, id: Id) -> String {
        format!("{}_{}", base, id)
    }

    /// Substring shared by every key built from `base`.
    pub fn family(base: &str) -> String {
        format!("{}_", base)
    }

    pub fn coach_clients(coach_id: Id) -> String {
        parametrized(COACH_CLIENTS, coach_id)
    }

    pub fn coach_stats(coach_id: Id) -> String {
        parametrized(COACH_STATS, coach_id)
    }

    pub fn client_check_ins(client_id: Id) -> String {
        parametrized(CLIENT_CHECK_INS, client_id)
    }
}

// == Datasets ==
/// A logical key bound to the one payload type it may hold.
///
/// Read and write through [`crate::cache::CacheManager::fetch`] and
/// [`crate::cache::CacheManager::store`] so the compiler checks the shape.
pub trait CachedDataset {
    type Value: Serialize + DeserializeOwned;

    /// Tier used when this dataset is written.
    const TIER: TtlTier;

    fn key(&self) -> String;
}

macro_rules! static_dataset {
    ($(#[$meta:meta])* $name:ident, $value:ty, $tier:expr, $key:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name;

        impl CachedDataset for $name {
            type Value = $value;
            const TIER: TtlTier = $tier;

            fn key(&self) -> String {
                $key.to_string()
            }
        }
    };
}

macro_rules! keyed_dataset {
    ($(#[$meta:meta])* $name:ident, $value:ty, $tier:expr, $factory:path) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name(pub Id);

        impl CachedDataset for $name {
            type Value = $value;
            const TIER: TtlTier = $tier;

            fn key(&self) -> String {
                $factory(self.0)
            }
        }
    };
}

static_dataset!(
    /// Coach roster
    AllCoaches, Vec<Coach>, TtlTier::Medium, keys::ALL_COACHES
);
static_dataset!(
    /// Every client, full shape
    AllClients, Vec<Client>, TtlTier::Medium, keys::ALL_CLIENTS
);
static_dataset!(
    /// Every client, lightweight shape
    ClientSummaries, Vec<ClientSummary>, TtlTier::Medium, keys::ALL_CLIENTS_SUMMARY
);
static_dataset!(
    /// Unresolved alerts
    ActiveAlerts, Vec<Alert>, TtlTier::Short, keys::ACTIVE_ALERTS
);
static_dataset!(PricingTiers, Vec<PricingTier>, TtlTier::Long, keys::PRICING_TIERS);

keyed_dataset!(
    /// Clients assigned to one coach
    CoachClients, Vec<Client>, TtlTier::Short, keys::coach_clients
);
keyed_dataset!(CoachStatsFor, CoachStats, TtlTier::Short, keys::coach_stats);
keyed_dataset!(
    /// Check-ins of one client, newest first
    ClientCheckIns, Vec<CheckIn>, TtlTier::Short, keys::client_check_ins
);
