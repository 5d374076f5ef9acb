//! Common test utilities for customer-support-api integration tests
//!
//! This module provides:
//! - Mock implementations of [`RefreshJobTrigger`]
//! - Helper functions for building app state, requests and payloads
//! - Response body decoding

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use customer_support_api::{create_router, AppState, ServiceConfig, ServiceMetrics};
use customer_support_core::{JobHandle, PlaceholderRefreshTrigger, RefreshJobTrigger, TriggerError};
use serde_json::{json, Value};
use std::sync::Arc;

// ============================================================================
// Mock Refresh Trigger
// ============================================================================

/// Trigger that fails every request with the given message
#[allow(dead_code)]
pub struct FailingRefreshTrigger {
    message: String,
}

impl FailingRefreshTrigger {
    #[allow(dead_code)]
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl RefreshJobTrigger for FailingRefreshTrigger {
    async fn start_refresh(&self) -> Result<JobHandle, TriggerError> {
        Err(TriggerError::StartFailed {
            message: self.message.clone(),
        })
    }
}

// ============================================================================
// App construction
// ============================================================================

/// App state with default configuration and the placeholder trigger
#[allow(dead_code)]
pub fn create_test_app_state() -> AppState {
    create_test_app_state_with_trigger(Arc::new(PlaceholderRefreshTrigger))
}

/// App state with a custom refresh trigger
#[allow(dead_code)]
pub fn create_test_app_state_with_trigger(trigger: Arc<dyn RefreshJobTrigger>) -> AppState {
    AppState::new(
        ServiceConfig::default(),
        trigger,
        ServiceMetrics::new().expect("metrics registry should initialize"),
    )
}

/// Router backed by [`create_test_app_state`]
#[allow(dead_code)]
pub fn create_test_app() -> axum::Router {
    create_router(create_test_app_state())
}

// ============================================================================
// Requests and payloads
// ============================================================================

/// Fully populated ticket-creation event
#[allow(dead_code)]
pub fn valid_webhook_payload() -> Value {
    json!({
        "eventId": "test-event-123",
        "subscriptionId": 12345,
        "portalId": 67890,
        "occurredAt": 1_720_000_000_000_i64,
        "subscriptionType": "ticket.creation",
        "attemptNumber": 0,
        "objectId": 111222,
        "changeSource": "CRM_UI",
        "changeFlag": "NEW",
        "objectTypeId": "0-5"
    })
}

#[allow(dead_code)]
pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request should build")
}

#[allow(dead_code)]
pub fn post_json(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .expect("request should build")
}

#[allow(dead_code)]
pub fn post_value(uri: &str, value: &Value) -> Request<Body> {
    post_json(uri, value.to_string())
}

/// Decode a JSON response body
#[allow(dead_code)]
pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
