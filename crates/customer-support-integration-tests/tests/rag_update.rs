//! Integration tests for the RAG refresh trigger endpoint
//!
//! These tests verify:
//! - A refresh returns a started status with a fresh job id
//! - The request body is ignored
//! - Trigger failures are reported as 500

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_test_app, create_test_app_state_with_trigger, post_json,
    FailingRefreshTrigger,
};
use customer_support_api::create_router;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

#[tokio::test]
async fn test_rag_update_reports_started() {
    // Arrange
    let app = create_test_app();

    // Act
    let response = app.oneshot(post_json("/rag/update", "")).await.unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "started");
    let job_id = body["jobId"].as_str().expect("jobId should be a string");
    let parsed = uuid::Uuid::parse_str(job_id).expect("jobId should be a UUID");
    assert_eq!(parsed.get_version_num(), 4);
}

#[tokio::test]
async fn test_rag_update_returns_distinct_job_ids() {
    let app = create_test_app();

    let first = body_json(
        app.clone()
            .oneshot(post_json("/rag/update", ""))
            .await
            .unwrap(),
    )
    .await;
    let second = body_json(app.oneshot(post_json("/rag/update", "")).await.unwrap()).await;

    assert_ne!(first["jobId"], second["jobId"]);
}

/// Whatever the caller sends is not read
#[tokio::test]
async fn test_rag_update_ignores_request_body() {
    let app = create_test_app();

    let response = app
        .oneshot(post_json("/rag/update", "{definitely not json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_rag_update_trigger_failure_returns_internal_error() {
    // Arrange
    let state =
        create_test_app_state_with_trigger(Arc::new(FailingRefreshTrigger::new("index offline")));
    let app = create_router(state);

    // Act
    let response = app.oneshot(post_json("/rag/update", "")).await.unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Failed to start RAG update" })
    );
}
