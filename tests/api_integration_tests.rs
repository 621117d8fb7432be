//! Integration Tests for API Endpoints
//!
//! Drives full request/response cycles against the seeded demo store:
//! pricing tiers 1 and 2, coach 3, clients 4 and 5.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use session_cache::{
    api::create_router, config::StorageBackend, AppState, Config, InMemoryRemote,
};
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    let state = AppState::from_config(&Config::default(), Arc::new(InMemoryRemote::seeded()));
    create_router(state)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// == Coaches ==

#[tokio::test]
async fn test_list_coaches() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/coaches", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["name"], "Alex Moreno");
}

#[tokio::test]
async fn test_create_coach_visible_on_next_read() {
    let app = create_test_app();
    send(&app, "GET", "/coaches", None).await;

    let (status, created) = send(
        &app,
        "POST",
        "/coaches",
        Some(json!({"name": "Kim Park", "email": "kim@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["active"], true);

    let (_, json) = send(&app, "GET", "/coaches", None).await;
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_delete_coach_with_clients_is_bad_request() {
    let app = create_test_app();

    let (status, json) = send(&app, "DELETE", "/coaches/3", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("clients assigned"));
}

#[tokio::test]
async fn test_coach_stats_not_found() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/coaches/42/stats", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json.get("error").is_some());
}

// == Clients ==

#[tokio::test]
async fn test_client_shapes() {
    let app = create_test_app();

    let (_, full) = send(&app, "GET", "/clients", None).await;
    let (_, summary) = send(&app, "GET", "/clients/summary", None).await;

    assert!(full[0].get("email").is_some());
    assert!(summary[0].get("email").is_none());
    assert_eq!(full[0]["id"], summary[0]["id"]);
}

#[tokio::test]
async fn test_update_client_refreshes_coach_views() {
    let app = create_test_app();
    let (_, coach) = send(
        &app,
        "POST",
        "/coaches",
        Some(json!({"name": "Kim Park", "email": "kim@example.com"})),
    )
    .await;
    let kim = coach["id"].as_u64().unwrap();

    let (_, before) = send(&app, "GET", "/coaches/3/clients", None).await;
    assert_eq!(before.as_array().unwrap().len(), 2);
    send(&app, "GET", &format!("/coaches/{}/clients", kim), None).await;

    let (status, _) = send(&app, "PUT", "/clients/4", Some(json!({"coach_id": kim}))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, old_coach) = send(&app, "GET", "/coaches/3/clients", None).await;
    let (_, new_coach) = send(&app, "GET", &format!("/coaches/{}/clients", kim), None).await;
    assert_eq!(old_coach.as_array().unwrap().len(), 1);
    assert_eq!(new_coach.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_reassign_clients() {
    let app = create_test_app();
    let (_, coach) = send(
        &app,
        "POST",
        "/coaches",
        Some(json!({"name": "Kim Park", "email": "kim@example.com"})),
    )
    .await;
    let kim = coach["id"].as_u64().unwrap();
    send(&app, "GET", "/coaches/3/stats", None).await;

    let (status, json) = send(
        &app,
        "POST",
        "/clients/reassign",
        Some(json!({"from": 3, "to": kim})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["moved"], 2);

    let (_, stats) = send(&app, "GET", "/coaches/3/stats", None).await;
    assert_eq!(stats["client_count"], 0);
}

#[tokio::test]
async fn test_reassign_same_coach_rejected() {
    let app = create_test_app();

    let (status, _) = send(
        &app,
        "POST",
        "/clients/reassign",
        Some(json!({"from": 3, "to": 3})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// == Check-ins & Alerts ==

#[tokio::test]
async fn test_check_in_raises_alert_and_resolve_clears_it() {
    let app = create_test_app();
    let (_, alerts) = send(&app, "GET", "/alerts", None).await;
    assert!(alerts.as_array().unwrap().is_empty());

    let (status, _) = send(
        &app,
        "POST",
        "/clients/4/check-ins",
        Some(json!({"mood": 4, "adherence": 20})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, check_ins) = send(&app, "GET", "/clients/4/check-ins", None).await;
    assert_eq!(check_ins.as_array().unwrap().len(), 1);

    let (_, alerts) = send(&app, "GET", "/alerts", None).await;
    assert_eq!(alerts.as_array().unwrap().len(), 1);
    assert_eq!(alerts[0]["kind"], "low_adherence");

    let alert_id = alerts[0]["id"].as_u64().unwrap();
    let (status, resolved) =
        send(&app, "POST", &format!("/alerts/{}/resolve", alert_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resolved["status"], "resolved");

    let (_, alerts) = send(&app, "GET", "/alerts", None).await;
    assert!(alerts.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_check_in() {
    let app = create_test_app();

    let (status, json) = send(
        &app,
        "POST",
        "/clients/4/check-ins",
        Some(json!({"mood": 7, "adherence": 20})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("mood"));
}

// == Pricing ==

#[tokio::test]
async fn test_update_pricing_visible_immediately() {
    let app = create_test_app();
    send(&app, "GET", "/pricing", None).await;

    let (status, _) = send(
        &app,
        "PUT",
        "/pricing/1",
        Some(json!({"monthly_price_cents": 10_900})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, tiers) = send(&app, "GET", "/pricing", None).await;
    assert_eq!(tiers[0]["monthly_price_cents"], 10_900);
}

// == Cache Diagnostics ==

#[tokio::test]
async fn test_stats_count_hits_and_misses() {
    let app = create_test_app();
    send(&app, "GET", "/pricing", None).await;
    send(&app, "GET", "/pricing", None).await;

    let (status, json) = send(&app, "GET", "/cache/stats", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["total_entries"], 1);
    assert!((json["hit_rate"].as_f64().unwrap() - 0.5).abs() < 0.001);
}

#[tokio::test]
async fn test_fresh_query_bypasses_cache() {
    let app = create_test_app();
    send(&app, "GET", "/pricing", None).await;
    send(&app, "GET", "/pricing?fresh=true", None).await;

    let (_, json) = send(&app, "GET", "/cache/stats", None).await;

    assert_eq!(json["hits"], 0);
    assert_eq!(json["writes"], 2);
}

#[tokio::test]
async fn test_inspect_entry() {
    let app = create_test_app();
    send(&app, "GET", "/alerts", None).await;

    let (status, json) = send(&app, "GET", "/cache/entries/active_alerts", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["key"], "active_alerts");
    let written = json["written_at"].as_u64().unwrap();
    let expires = json["expires_at"].as_u64().unwrap();
    assert_eq!(expires - written, 120_000);
}

#[tokio::test]
async fn test_logout_clears_session() {
    let app = create_test_app();
    send(&app, "GET", "/coaches", None).await;
    send(&app, "GET", "/clients", None).await;

    let (status, json) = send(&app, "POST", "/session/logout", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["removed"], 2);

    let (_, stats) = send(&app, "GET", "/cache/stats", None).await;
    assert_eq!(stats["total_entries"], 0);
}

#[tokio::test]
async fn test_clear_expired_keeps_fresh_entries() {
    let app = create_test_app();
    send(&app, "GET", "/coaches", None).await;

    let (status, json) = send(&app, "POST", "/cache/clear-expired", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["removed"], 0);
    let (status, _) = send(&app, "GET", "/cache/entries/all_coaches", None).await;
    assert_eq!(status, StatusCode::OK);
}

// == Disabled Backend ==

#[tokio::test]
async fn test_disabled_backend_serves_every_read_from_store() {
    let config = Config {
        backend: StorageBackend::Disabled,
        ..Config::default()
    };
    let app = create_router(AppState::from_config(
        &config,
        Arc::new(InMemoryRemote::seeded()),
    ));

    let (status, coaches) = send(&app, "GET", "/coaches", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(coaches.as_array().unwrap().len(), 1);
    send(&app, "GET", "/coaches", None).await;

    let (_, stats) = send(&app, "GET", "/cache/stats", None).await;
    assert_eq!(stats["hits"], 0);
    assert_eq!(stats["total_entries"], 0);

    let (_, health) = send(&app, "GET", "/health", None).await;
    assert_eq!(health["backend"], "disabled");
}

// == Error Handling ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}

#[tokio::test]
async fn test_invalid_json_request() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/coaches")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"name": "#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}
