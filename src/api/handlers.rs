//! API Handlers
//!
//! Thin HTTP wrappers over [`DataAccess`]. Every read honours `?fresh=true`
//! as the cache bypass flag; every write goes through the invalidating
//! data-access call.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::cache::{CacheManager, EntryInfo};
use crate::config::{Config, StorageBackend};
use crate::data::DataAccess;
use crate::error::{ApiError, Result};
use crate::models::{
    Alert, CheckIn, ClearedResponse, Client, ClientSummary, ClientUpdate, Coach, CoachStats,
    CoachUpdate, FreshQuery, HealthResponse, Id, NewCheckIn, NewClient, NewCoach, PricingTier,
    PricingUpdate, ReassignRequest, ReassignResponse, StatsResponse,
};
use crate::remote::RemoteStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub data: Arc<DataAccess>,
    pub backend: StorageBackend,
}

impl AppState {
    /// Creates a new AppState around an existing data-access layer.
    pub fn new(data: Arc<DataAccess>, backend: StorageBackend) -> Self {
        Self { data, backend }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Builds the configured cache backend in front of `remote`.
    pub fn from_config(config: &Config, remote: Arc<dyn RemoteStore>) -> Self {
        let cache = Arc::new(CacheManager::from_config(config));
        Self::new(Arc::new(DataAccess::new(cache, remote)), config.backend)
    }

    pub fn cache(&self) -> &Arc<CacheManager> {
        self.data.cache()
    }
}

// == Coaches ==
pub async fn list_coaches(
    State(state): State<AppState>,
    Query(q): Query<FreshQuery>,
) -> Result<Json<Vec<Coach>>> {
    Ok(Json(state.data.coaches(q.fresh).await?))
}

pub async fn create_coach(
    State(state): State<AppState>,
    Json(req): Json<NewCoach>,
) -> Result<Json<Coach>> {
    Ok(Json(state.data.create_coach(req).await?))
}

pub async fn update_coach(
    State(state): State<AppState>,
    Path(id): Path<Id>,
    Json(req): Json<CoachUpdate>,
) -> Result<Json<Coach>> {
    Ok(Json(state.data.update_coach(id, req).await?))
}

pub async fn delete_coach(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<Json<Coach>> {
    Ok(Json(state.data.delete_coach(id).await?))
}

pub async fn coach_clients(
    State(state): State<AppState>,
    Path(id): Path<Id>,
    Query(q): Query<FreshQuery>,
) -> Result<Json<Vec<Client>>> {
    Ok(Json(state.data.coach_clients(id, q.fresh).await?))
}

pub async fn coach_stats(
    State(state): State<AppState>,
    Path(id): Path<Id>,
    Query(q): Query<FreshQuery>,
) -> Result<Json<CoachStats>> {
    Ok(Json(state.data.coach_stats(id, q.fresh).await?))
}

// == Clients ==
pub async fn list_clients(
    State(state): State<AppState>,
    Query(q): Query<FreshQuery>,
) -> Result<Json<Vec<Client>>> {
    Ok(Json(state.data.clients(q.fresh).await?))
}

pub async fn list_client_summaries(
    State(state): State<AppState>,
    Query(q): Query<FreshQuery>,
) -> Result<Json<Vec<ClientSummary>>> {
    Ok(Json(state.data.client_summaries(q.fresh).await?))
}

pub async fn create_client(
    State(state): State<AppState>,
    Json(req): Json<NewClient>,
) -> Result<Json<Client>> {
    Ok(Json(state.data.create_client(req).await?))
}

pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<Id>,
    Json(req): Json<ClientUpdate>,
) -> Result<Json<Client>> {
    Ok(Json(state.data.update_client(id, req).await?))
}

pub async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<Json<Client>> {
    Ok(Json(state.data.delete_client(id).await?))
}

pub async fn reassign_clients(
    State(state): State<AppState>,
    Json(req): Json<ReassignRequest>,
) -> Result<Json<ReassignResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let moved = state.data.reassign_clients(req.from, req.to).await?;
    Ok(Json(ReassignResponse { moved }))
}

// == Check-ins ==
pub async fn list_check_ins(
    State(state): State<AppState>,
    Path(id): Path<Id>,
    Query(q): Query<FreshQuery>,
) -> Result<Json<Vec<CheckIn>>> {
    Ok(Json(state.data.check_ins(id, q.fresh).await?))
}

pub async fn submit_check_in(
    State(state): State<AppState>,
    Path(id): Path<Id>,
    Json(req): Json<NewCheckIn>,
) -> Result<Json<CheckIn>> {
    Ok(Json(state.data.submit_check_in(id, req).await?))
}

// == Alerts ==
pub async fn list_alerts(
    State(state): State<AppState>,
    Query(q): Query<FreshQuery>,
) -> Result<Json<Vec<Alert>>> {
    Ok(Json(state.data.active_alerts(q.fresh).await?))
}

pub async fn resolve_alert(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<Json<Alert>> {
    Ok(Json(state.data.resolve_alert(id).await?))
}

// == Pricing ==
pub async fn list_pricing(
    State(state): State<AppState>,
    Query(q): Query<FreshQuery>,
) -> Result<Json<Vec<PricingTier>>> {
    Ok(Json(state.data.pricing_tiers(q.fresh).await?))
}

pub async fn update_pricing(
    State(state): State<AppState>,
    Path(id): Path<Id>,
    Json(req): Json<PricingUpdate>,
) -> Result<Json<PricingTier>> {
    Ok(Json(state.data.update_pricing_tier(id, req).await?))
}

// == Cache Diagnostics ==
/// Handler for GET /cache/stats
pub async fn cache_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache().stats()))
}

/// Handler for GET /cache/entries/:key
///
/// `key` is the logical key, without the prefix.
pub async fn inspect_entry(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<EntryInfo>> {
    state
        .cache()
        .inspect(&key)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("cache entry '{}'", key)))
}

/// Handler for POST /cache/clear-expired
pub async fn clear_expired(State(state): State<AppState>) -> Json<ClearedResponse> {
    Json(ClearedResponse {
        removed: state.cache().clear_expired(),
    })
}

/// Handler for POST /session/logout
pub async fn logout(State(state): State<AppState>) -> Json<ClearedResponse> {
    Json(ClearedResponse {
        removed: state.data.end_session(),
    })
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.backend.as_str()))
}
