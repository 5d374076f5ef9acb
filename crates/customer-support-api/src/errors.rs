//! Error types for the HTTP service

use crate::responses::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use customer_support_core::{CoreError, ErrorCategory, PayloadError, TriggerError};
use tracing::{debug, error};

/// Client-facing message for payloads that fail validation
pub const INVALID_WEBHOOK_PAYLOAD: &str = "Invalid webhook payload";

/// Client-facing message for unexpected failures
pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";

/// Client-facing message when a refresh job cannot be started
pub const RAG_UPDATE_FAILED: &str = "Failed to start RAG update";

/// Handler errors with HTTP status code mapping
///
/// - `400 Bad Request`: domain errors in the [`ErrorCategory::Client`]
///   category, i.e. a body that is JSON but not a valid event
/// - `500 Internal Server Error`: everything else, including bodies that are
///   not JSON at all
///
/// Messages returned to clients are fixed strings. The underlying cause is
/// only ever logged server side.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// Domain failure; status follows [`CoreError::error_category`]
    #[error("Request failed: {0}")]
    Core(#[from] CoreError),

    /// Body is not valid JSON
    #[error("Malformed request body: {0}")]
    MalformedBody(#[from] serde_json::Error),
}

impl From<PayloadError> for HandlerError {
    fn from(error: PayloadError) -> Self {
        Self::Core(CoreError::Payload(error))
    }
}

impl From<TriggerError> for HandlerError {
    fn from(error: TriggerError) -> Self {
        Self::Core(CoreError::Trigger(error))
    }
}

impl HandlerError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Core(e) => match e.error_category() {
                ErrorCategory::Client => StatusCode::BAD_REQUEST,
                ErrorCategory::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::MalformedBody(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Fixed message returned in the `error` field of the response body
    pub fn client_message(&self) -> &'static str {
        match self {
            Self::Core(CoreError::Payload(_)) => INVALID_WEBHOOK_PAYLOAD,
            Self::Core(CoreError::Trigger(_)) => RAG_UPDATE_FAILED,
            Self::MalformedBody(_) => INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        match &self {
            Self::Core(CoreError::Payload(reason)) => {
                debug!(reason = %reason, "Rejected webhook payload");
            }
            Self::Core(CoreError::Trigger(e)) => {
                error!(error = %e, "Error starting RAG update");
            }
            Self::MalformedBody(e) => {
                error!(error = %e, "Error processing webhook");
            }
        }

        let body = ErrorResponse {
            error: self.client_message().to_string(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

/// Service-level errors
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Failed to bind to address {address}: {message}")]
    BindFailed { address: String, message: String },

    #[error("Server failed: {message}")]
    ServerFailed { message: String },

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Metrics initialization failed: {0}")]
    Metrics(#[from] prometheus::Error),
}

impl ServiceError {
    /// Process exit code for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::BindFailed { .. } => 1,
            Self::ServerFailed { .. } => 2,
            Self::Configuration(_) => 3,
            Self::Metrics(_) => 4,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Configuration loading failed: {0}")]
    Load(#[from] config::ConfigError),
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;
