//! Integration tests for HTTP routing
//!
//! These tests verify:
//! - Every public endpoint is routed
//! - Unknown paths and wrong methods are rejected by the router
//! - Every response carries a correlation id

mod common;

use axum::http::StatusCode;
use common::{create_test_app, get_request, post_json, post_value, valid_webhook_payload};
use customer_support_api::CORRELATION_ID_HEADER;
use tower::ServiceExt;

#[tokio::test]
async fn test_all_routes_exist() {
    let app = create_test_app();

    let requests = vec![
        get_request("/"),
        get_request("/health"),
        get_request("/metrics"),
        post_value("/webhook/hubspot", &valid_webhook_payload()),
        post_json("/rag/update", ""),
    ];

    for request in requests {
        let uri = request.uri().clone();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "route {} should exist", uri);
    }
}

#[tokio::test]
async fn test_unknown_path_returns_not_found() {
    // Arrange
    let app = create_test_app();

    // Act
    let response = app.oneshot(get_request("/does/not/exist")).await.unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Method mismatches are answered by the router, not the handlers
#[tokio::test]
async fn test_wrong_method_returns_method_not_allowed() {
    let app = create_test_app();

    let get_webhook = app
        .clone()
        .oneshot(get_request("/webhook/hubspot"))
        .await
        .unwrap();
    let post_health = app.oneshot(post_json("/health", "")).await.unwrap();

    assert_eq!(get_webhook.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(post_health.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_responses_carry_correlation_id() {
    let app = create_test_app();

    let response = app.oneshot(get_request("/")).await.unwrap();

    let header = response
        .headers()
        .get(CORRELATION_ID_HEADER)
        .expect("correlation id should be set")
        .to_str()
        .unwrap();
    assert!(uuid::Uuid::parse_str(header).is_ok());
}

#[tokio::test]
async fn test_metrics_endpoint_exposes_prometheus_text() {
    let app = create_test_app();

    let response = app.oneshot(get_request("/metrics")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("# TYPE"));
}
