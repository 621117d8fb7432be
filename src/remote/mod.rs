//! Remote Store Module
//!
//! Interface to the hosted database the dashboard reads from and writes to.
//! The cache sees its responses only as opaque serializable payloads.

mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    Alert, CheckIn, Client, ClientSummary, ClientUpdate, Coach, CoachStats, CoachUpdate, Id,
    NewCheckIn, NewClient, NewCoach, PricingTier, PricingUpdate,
};

pub use memory::InMemoryRemote;

// == Remote Error Enum ==
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// No row with that id
    #[error("{0} not found")]
    NotFound(String),

    /// The store rejected the mutation
    #[error("{0}")]
    Invalid(String),

    /// The store could not be reached
    #[error("remote store unavailable: {0}")]
    Unavailable(String),
}

pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// CRUD surface of the hosted store, one group of calls per table.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    // Coaches
    async fn list_coaches(&self) -> RemoteResult<Vec<Coach>>;
    async fn create_coach(&self, coach: NewCoach) -> RemoteResult<Coach>;
    async fn update_coach(&self, id: Id, update: CoachUpdate) -> RemoteResult<Coach>;
    /// Fails while the coach still has clients assigned.
    async fn delete_coach(&self, id: Id) -> RemoteResult<Coach>;
    async fn coach_stats(&self, coach_id: Id) -> RemoteResult<CoachStats>;

    // Clients
    async fn list_clients(&self) -> RemoteResult<Vec<Client>>;
    async fn list_client_summaries(&self) -> RemoteResult<Vec<ClientSummary>>;
    async fn list_clients_for_coach(&self, coach_id: Id) -> RemoteResult<Vec<Client>>;
    async fn get_client(&self, id: Id) -> RemoteResult<Client>;
    async fn create_client(&self, client: NewClient) -> RemoteResult<Client>;
    async fn update_client(&self, id: Id, update: ClientUpdate) -> RemoteResult<Client>;
    async fn delete_client(&self, id: Id) -> RemoteResult<Client>;
    /// Moves every client of `from` to `to`, returning how many moved.
    async fn reassign_clients(&self, from: Id, to: Id) -> RemoteResult<usize>;

    // Check-ins
    /// Newest first.
    async fn list_check_ins(&self, client_id: Id) -> RemoteResult<Vec<CheckIn>>;
    async fn create_check_in(&self, client_id: Id, check_in: NewCheckIn)
        -> RemoteResult<CheckIn>;

    // Alerts
    async fn list_active_alerts(&self) -> RemoteResult<Vec<Alert>>;
    async fn resolve_alert(&self, id: Id) -> RemoteResult<Alert>;

    // Pricing
    async fn list_pricing_tiers(&self) -> RemoteResult<Vec<PricingTier>>;
    async fn update_pricing_tier(&self, id: Id, update: PricingUpdate)
        -> RemoteResult<PricingTier>;
}
