//! Data models for the dashboard API
//!
//! `entities` holds the records cached by the data-access layer; `requests`
//! and `responses` hold the HTTP bodies that only the API layer sees.

pub mod entities;
pub mod requests;
pub mod responses;

pub use entities::{
    Alert, AlertKind, AlertStatus, CheckIn, Client, ClientStatus, ClientSummary, ClientUpdate,
    Coach, CoachStats, CoachUpdate, Id, NewCheckIn, NewClient, NewCoach, PricingTier,
    PricingUpdate,
};
pub use requests::{FreshQuery, ReassignRequest};
pub use responses::{ClearedResponse, HealthResponse, ReassignResponse, StatsResponse};
