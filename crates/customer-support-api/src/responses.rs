//! Response types for the API.

use customer_support_core::JobHandle;
use serde::{Deserialize, Serialize};

/// Service name reported by the health endpoint
pub const SERVICE_NAME: &str = "ai-customer-support";

/// Greeting returned from the root endpoint
pub const WELCOME_MESSAGE: &str = "AI Customer Support API";

/// Root endpoint response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

impl Default for RootResponse {
    fn default() -> Self {
        Self {
            message: WELCOME_MESSAGE.to_string(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "OK".to_string(),
            service: SERVICE_NAME.to_string(),
        }
    }
}

/// Acknowledgment for an accepted webhook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookAckResponse {
    pub status: String,
    pub event_id: String,
}

impl WebhookAckResponse {
    pub fn received(event_id: impl Into<String>) -> Self {
        Self {
            status: "received".to_string(),
            event_id: event_id.into(),
        }
    }
}

/// Response for a started refresh job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RagUpdateResponse {
    pub status: String,
    pub job_id: JobHandle,
}

impl RagUpdateResponse {
    pub fn started(job_id: JobHandle) -> Self {
        Self {
            status: "started".to_string(),
            job_id,
        }
    }
}

/// Error body shared by every failure response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
