//! Dashboard records as returned by the remote store.
//!
//! The cache treats all of these as opaque JSON payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier type used by every table.
pub type Id = u64;

// == Coaches ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coach {
    pub id: Id,
    pub name: String,
    pub email: String,
    pub specialty: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCoach {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub specialty: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoachUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
}

/// Live numbers for one coach's roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachStats {
    pub coach_id: Id,
    pub client_count: usize,
    pub active_clients: usize,
    pub check_ins_last_7_days: usize,
    pub open_alerts: usize,
    /// Mean adherence over the last 7 days, None without check-ins
    pub average_adherence: Option<f64>,
}

// == Clients ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    Active,
    Paused,
    Churned,
}

/// Full client record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: Id,
    pub name: String,
    pub email: String,
    pub coach_id: Option<Id>,
    pub pricing_tier_id: Option<Id>,
    pub status: ClientStatus,
    pub joined_at: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Lightweight client shape for pickers and lists.
///
/// Cached under its own key; never shares one with [`Client`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSummary {
    pub id: Id,
    pub name: String,
    pub coach_id: Option<Id>,
    pub status: ClientStatus,
}

impl From<&Client> for ClientSummary {
    fn from(client: &Client) -> Self {
        Self {
            id: client.id,
            name: client.name.clone(),
            coach_id: client.coach_id,
            status: client.status,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewClient {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub coach_id: Option<Id>,
    #[serde(default)]
    pub pricing_tier_id: Option<Id>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub coach_id: Option<Id>,
    #[serde(default)]
    pub pricing_tier_id: Option<Id>,
    #[serde(default)]
    pub status: Option<ClientStatus>,
    #[serde(default)]
    pub notes: Option<String>,
}

// == Check-ins ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckIn {
    pub id: Id,
    pub client_id: Id,
    pub submitted_at: DateTime<Utc>,
    pub weight_kg: Option<f64>,
    /// 1 (bad) to 5 (great)
    pub mood: u8,
    /// Percentage of the plan followed since the previous check-in
    pub adherence: u8,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCheckIn {
    #[serde(default)]
    pub weight_kg: Option<f64>,
    pub mood: u8,
    pub adherence: u8,
    #[serde(default)]
    pub notes: Option<String>,
}

// == Alerts ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    LowAdherence,
    LowMood,
    ChurnRisk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    New,
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: Id,
    pub client_id: Id,
    pub coach_id: Option<Id>,
    pub kind: AlertKind,
    pub status: AlertStatus,
    pub created_at: DateTime<Utc>,
}

// == Pricing ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingTier {
    pub id: Id,
    pub name: String,
    pub monthly_price_cents: u64,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PricingUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub monthly_price_cents: Option<u64>,
    #[serde(default)]
    pub description: Option<String>,
}
