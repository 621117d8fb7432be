//! API Routes
//!
//! Configures the Axum router with all dashboard endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{self, AppState};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/coaches",
            get(handlers::list_coaches).post(handlers::create_coach),
        )
        .route(
            "/coaches/:id",
            put(handlers::update_coach).delete(handlers::delete_coach),
        )
        .route("/coaches/:id/clients", get(handlers::coach_clients))
        .route("/coaches/:id/stats", get(handlers::coach_stats))
        .route(
            "/clients",
            get(handlers::list_clients).post(handlers::create_client),
        )
        .route("/clients/summary", get(handlers::list_client_summaries))
        .route("/clients/reassign", post(handlers::reassign_clients))
        .route(
            "/clients/:id",
            put(handlers::update_client).delete(handlers::delete_client),
        )
        .route(
            "/clients/:id/check-ins",
            get(handlers::list_check_ins).post(handlers::submit_check_in),
        )
        .route("/alerts", get(handlers::list_alerts))
        .route("/alerts/:id/resolve", post(handlers::resolve_alert))
        .route("/pricing", get(handlers::list_pricing))
        .route("/pricing/:id", put(handlers::update_pricing))
        .route("/cache/stats", get(handlers::cache_stats))
        .route("/cache/entries/:key", get(handlers::inspect_entry))
        .route("/cache/clear-expired", post(handlers::clear_expired))
        .route("/session/logout", post(handlers::logout))
        .route("/health", get(handlers::health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
