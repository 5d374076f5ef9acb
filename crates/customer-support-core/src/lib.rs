//! # Customer Support Core
//!
//! Domain logic for the AI customer support service.
//!
//! This crate holds everything that does not depend on the HTTP layer:
//! - decoding and validating CRM change notifications ([`webhook`])
//! - issuing handles for retrieval-index refresh jobs ([`jobs`])
//! - extracting historical question/answer pairs from the analytical
//!   warehouse ([`extraction`])
//!
//! ## Usage
//!
//! ```rust
//! use customer_support_core::webhook::WebhookEvent;
//! use serde_json::json;
//!
//! let payload = json!({
//!     "eventId": "evt-1",
//!     "subscriptionId": 1,
//!     "portalId": 2,
//!     "occurredAt": 1_700_000_000_000_i64,
//!     "subscriptionType": "ticket.creation",
//!     "attemptNumber": 0,
//!     "objectId": 3,
//!     "changeSource": "CRM_UI",
//!     "changeFlag": "NEW",
//!     "objectTypeId": "0-5"
//! });
//!
//! let event = WebhookEvent::from_value(&payload).unwrap();
//! assert_eq!(event.event_id, "evt-1");
//! ```

// ============================================================================
// Error Types
// ============================================================================

/// High-level error categorization, used by the HTTP layer to pick a status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The caller sent something we cannot accept; retrying will not help
    Client,
    /// Something failed on our side or in a collaborator
    Internal,
}

/// Errors raised while handling an inbound request
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Payload error: {0}")]
    Payload(#[from] PayloadError),

    #[error("Job trigger error: {0}")]
    Trigger(#[from] TriggerError),
}

impl CoreError {
    /// Get error category for status mapping
    pub fn error_category(&self) -> ErrorCategory {
        match self {
            Self::Payload(_) => ErrorCategory::Client,
            Self::Trigger(_) => ErrorCategory::Internal,
        }
    }
}

// ============================================================================
// Module declarations
// ============================================================================

/// Webhook payload decoding for CRM change notifications
pub mod webhook;

/// Refresh job handles and triggers
pub mod jobs;

/// Question/answer extraction from the analytical warehouse
pub mod extraction;

// Re-export key types for convenience
pub use extraction::{
    ExtractionConfig, ExtractionError, MockExtractionService, QaMetadata, QaPair, QaPairSource,
    QueryParams, QueryTemplate, StartDate, WarehouseClient, WarehouseError,
    WarehouseExtractionService,
};
pub use jobs::{JobHandle, PlaceholderRefreshTrigger, RefreshJobTrigger, TriggerError};
pub use webhook::{validate_webhook_payload, FieldKind, PayloadError, WebhookEvent};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
