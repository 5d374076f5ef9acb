//! # AI Customer Support HTTP Service
//!
//! HTTP server for the AI customer support backend.
//!
//! This service provides:
//! - a welcome endpoint and a health check
//! - a HubSpot CRM webhook receiver with payload validation
//! - a trigger endpoint for retrieval-index (RAG) refreshes
//! - Prometheus metrics
//!
//! [`create_router`] returns a plain [`axum::Router`], so the whole service can
//! be driven in-process with `tower::ServiceExt::oneshot` as well as served
//! over TCP with [`start_server`].

pub mod config;
pub mod errors;
pub mod metrics;
pub mod middleware;
pub mod responses;

pub use config::{
    resolve_port, LoggingConfig, ServerConfig, ServiceConfig, DEFAULT_PORT, PORT_ENV,
};
pub use errors::{ConfigError, HandlerError, ServiceError};
pub use metrics::ServiceMetrics;
pub use middleware::{CorrelationId, CORRELATION_ID_HEADER};
pub use responses::{
    ErrorResponse, HealthResponse, RagUpdateResponse, RootResponse, WebhookAckResponse,
    SERVICE_NAME, WELCOME_MESSAGE,
};

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use customer_support_core::{RefreshJobTrigger, WebhookEvent};
use std::{future::IntoFuture, sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, instrument, warn};

// ============================================================================
// Application State
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Configuration for the service
    pub config: ServiceConfig,

    /// Starts retrieval-index refresh jobs
    pub refresh_trigger: Arc<dyn RefreshJobTrigger>,

    /// Metrics collector for observability
    pub metrics: Arc<ServiceMetrics>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        config: ServiceConfig,
        refresh_trigger: Arc<dyn RefreshJobTrigger>,
        metrics: Arc<ServiceMetrics>,
    ) -> Self {
        Self {
            config,
            refresh_trigger,
            metrics,
        }
    }
}

// ============================================================================
// HTTP Server
// ============================================================================

/// Create HTTP router with all endpoints
pub fn create_router(state: AppState) -> Router {
    let server_config = &state.config.server;

    let mut router = Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health_check))
        .route("/webhook/hubspot", post(handle_hubspot_webhook))
        .route("/rag/update", post(handle_rag_update))
        .route("/metrics", get(metrics_endpoint))
        .layer(DefaultBodyLimit::max(server_config.max_body_size));

    if server_config.enable_compression {
        router = router.layer(CompressionLayer::new());
    }

    if server_config.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(
                    middleware::request_logging_middleware,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    middleware::metrics_middleware,
                ))
                .into_inner(),
        )
        .with_state(state)
}

/// Start HTTP server
///
/// Runs until SIGINT or SIGTERM. In-flight requests are given
/// `server.shutdown_timeout_seconds` to finish before the server stops.
pub async fn start_server(
    config: ServiceConfig,
    refresh_trigger: Arc<dyn RefreshJobTrigger>,
) -> Result<(), ServiceError> {
    config.validate()?;

    let metrics = ServiceMetrics::new()?;
    let address = config.server.bind_address();
    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_seconds);

    let state = AppState::new(config, refresh_trigger, metrics);
    let app = create_router(state);

    let listener =
        tokio::net::TcpListener::bind(&address)
            .await
            .map_err(|e| ServiceError::BindFailed {
                address: address.clone(),
                message: e.to_string(),
            })?;

    info!("Server starting on {}", address);

    let (signal_tx, signal_rx) = tokio::sync::oneshot::channel::<()>();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = signal_tx.send(());
        })
        .into_future();

    let drain_deadline = async move {
        match signal_rx.await {
            Ok(()) => tokio::time::sleep(shutdown_timeout).await,
            Err(_) => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        result = server => {
            result.map_err(|e| ServiceError::ServerFailed {
                message: e.to_string(),
            })?;
        }
        _ = drain_deadline => {
            warn!(
                timeout_seconds = shutdown_timeout.as_secs(),
                "Graceful shutdown timed out; abandoning in-flight requests"
            );
        }
    }

    info!("HTTP server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        },
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Welcome message
pub async fn handle_root() -> Json<RootResponse> {
    Json(RootResponse::default())
}

/// Liveness check; always healthy while the process can answer
pub async fn handle_health_check() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Handle HubSpot CRM webhook deliveries
///
/// The body is read as raw bytes so that non-JSON bodies reach the internal
/// error path instead of the extractor's own rejection. Deliveries are not
/// deduplicated and no signature is checked.
#[instrument(skip(state, body), fields(body_size = body.len()))]
pub async fn handle_hubspot_webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<WebhookAckResponse>, HandlerError> {
    let payload: serde_json::Value = serde_json::from_slice(&body).map_err(|e| {
        state.metrics.record_webhook_rejected("malformed_body");
        HandlerError::MalformedBody(e)
    })?;

    let event = WebhookEvent::from_value(&payload).map_err(|e| {
        state.metrics.record_webhook_rejected("invalid_payload");
        HandlerError::from(e)
    })?;

    info!(
        event_id = %event.event_id,
        subscription_type = %event.subscription_type,
        object_id = %event.object_id,
        attempt_number = %event.attempt_number,
        "Received HubSpot webhook: {} for object {}",
        event.subscription_type,
        event.object_id
    );
    state.metrics.record_webhook_received();

    Ok(Json(WebhookAckResponse::received(event.event_id)))
}

/// Kick off a retrieval-index refresh
///
/// The request body is never read.
#[instrument(skip(state))]
pub async fn handle_rag_update(
    State(state): State<AppState>,
) -> Result<Json<RagUpdateResponse>, HandlerError> {
    let job_id = state.refresh_trigger.start_refresh().await?;
    state.metrics.record_rag_job_started();

    Ok(Json(RagUpdateResponse::started(job_id)))
}

/// Prometheus metrics endpoint
#[instrument(skip_all)]
async fn metrics_endpoint(State(state): State<AppState>) -> Result<String, StatusCode> {
    state.metrics.encode().map_err(|e| {
        error!(error = %e, "Failed to encode metrics");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
