//! Request DTOs for the dashboard API
//!
//! Entity bodies (`NewCoach`, `ClientUpdate`, ...) are deserialized straight
//! into the types in [`super::entities`].

use serde::Deserialize;

use super::entities::Id;

/// Query string accepted by every read endpoint.
///
/// `?fresh=true` skips the cache lookup for that one read.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct FreshQuery {
    #[serde(default)]
    pub fresh: bool,
}

/// Request body for POST /clients/reassign
#[derive(Debug, Clone, Deserialize)]
pub struct ReassignRequest {
    /// Coach losing the clients
    pub from: Id,
    /// Coach receiving them
    pub to: Id,
}

impl ReassignRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.from == self.to {
            return Some("Source and target coach must differ".to_string());
        }
        None
    }
}
