//! Tests for HTTP middleware (logging, correlation ids, metrics)

use super::*;
use crate::{config::ServiceConfig, metrics::ServiceMetrics};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::get,
    Extension, Router,
};
use customer_support_core::PlaceholderRefreshTrigger;
use std::sync::Arc;
use tower::ServiceExt; // For `oneshot`

fn logging_app() -> Router {
    Router::new()
        .route(
            "/test",
            get(|Extension(id): Extension<CorrelationId>| async move { id.0 }),
        )
        .layer(axum::middleware::from_fn(request_logging_middleware))
}

#[tokio::test]
async fn test_request_logging_echoes_correlation_id() {
    // Arrange
    let request = Request::builder()
        .uri("/test")
        .header(CORRELATION_ID_HEADER, "test-correlation-123")
        .body(Body::empty())
        .unwrap();

    // Act
    let response = logging_app().oneshot(request).await.unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(CORRELATION_ID_HEADER).unwrap(),
        "test-correlation-123"
    );
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"test-correlation-123");
}

#[tokio::test]
async fn test_request_logging_generates_correlation_id_if_missing() {
    // Arrange
    let request = Request::builder().uri("/test").body(Body::empty()).unwrap();

    // Act
    let response = logging_app().oneshot(request).await.unwrap();

    // Assert
    let header = response
        .headers()
        .get(CORRELATION_ID_HEADER)
        .expect("correlation id header should be set")
        .to_str()
        .unwrap();
    assert!(uuid::Uuid::parse_str(header).is_ok());
}

#[tokio::test]
async fn test_request_logging_passes_through_error_statuses() {
    // Arrange
    let app = Router::new()
        .route(
            "/fail",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .layer(axum::middleware::from_fn(request_logging_middleware));

    let request = Request::builder().uri("/fail").body(Body::empty()).unwrap();

    // Act
    let response = app.oneshot(request).await.unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().contains_key(CORRELATION_ID_HEADER));
}

#[tokio::test]
async fn test_metrics_middleware_labels_by_route_template() {
    // Arrange
    let metrics = ServiceMetrics::new().unwrap();
    let state = AppState::new(
        ServiceConfig::default(),
        Arc::new(PlaceholderRefreshTrigger),
        metrics.clone(),
    );
    let app = Router::new()
        .route("/items/{id}", get(|| async { "OK" }))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            metrics_middleware,
        ))
        .with_state(state);

    let request = Request::builder()
        .uri("/items/42")
        .body(Body::empty())
        .unwrap();

    // Act
    let response = app.oneshot(request).await.unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        metrics
            .http_requests_total
            .with_label_values(&["GET", "/items/{id}", "200"])
            .get(),
        1
    );
}
