//! Integration tests for the health endpoint.

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use bfhl_service::services::providers::mock::MockTextProvider;
use bfhl_service::startup::{build_router, AppState};
use common::{test_config, TestApp, TEST_EMAIL};
use std::sync::Arc;
use tower::ServiceExt;

#[tokio::test]
async fn health_check_returns_ok() {
    let app = TestApp::spawn("Paris").await;

    let response = app
        .client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(
        body,
        serde_json::json!({"is_success": true, "official_email": TEST_EMAIL})
    );
}

#[tokio::test]
async fn health_check_sets_request_id() {
    let app = TestApp::spawn("Paris").await;

    let response = app
        .client
        .get(format!("{}/health", app.address))
        .header("x-request-id", "req-1")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.headers()["x-request-id"], "req-1");
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
}

#[tokio::test]
async fn health_check_via_router_ignores_body() {
    let state = AppState::new(test_config(), Arc::new(MockTextProvider::default()));

    let response = build_router(state)
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::from("{\"unexpected\": true}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["is_success"], true);
    assert_eq!(body["official_email"], TEST_EMAIL);
}

#[tokio::test]
async fn metrics_endpoint_responds() {
    let app = TestApp::spawn("Paris").await;

    let response = app
        .client
        .get(format!("{}/metrics", app.address))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 200);
}
