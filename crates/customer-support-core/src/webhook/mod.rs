//! # Webhook Payload Module
//!
//! Decodes HubSpot CRM change notifications from untyped JSON.
//!
//! Decoding is all-or-nothing: every required field must be present with the
//! right primitive type (string or number), otherwise the whole event is
//! rejected and the first offending field is reported. Any JSON number is
//! accepted for numeric fields and kept exactly as sent. Optional
//! property-change fields are never grounds for rejection.

use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::fmt;

// ============================================================================
// Core Types
// ============================================================================

/// A single CRM change notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    /// Unique per notification; duplicates are not detected
    pub event_id: String,
    pub subscription_id: Number,
    pub portal_id: Number,
    /// Epoch milliseconds
    pub occurred_at: Number,
    /// Category of change, e.g. `ticket.creation`
    pub subscription_type: String,
    /// Delivery retry counter
    pub attempt_number: Number,
    /// Identifier of the changed CRM object
    pub object_id: Number,
    pub change_source: String,
    /// Creation/update marker, e.g. `NEW`
    pub change_flag: String,
    pub object_type_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_value: Option<String>,
}

impl WebhookEvent {
    /// Decode an event from an arbitrary JSON value
    pub fn from_value(value: &Value) -> Result<Self, PayloadError> {
        let object = value.as_object().ok_or(PayloadError::NotAnObject {
            actual: json_type_name(value),
        })?;
        let fields = FieldReader { object };

        Ok(Self {
            event_id: fields.string("eventId")?,
            subscription_id: fields.number("subscriptionId")?,
            portal_id: fields.number("portalId")?,
            occurred_at: fields.number("occurredAt")?,
            subscription_type: fields.string("subscriptionType")?,
            attempt_number: fields.number("attemptNumber")?,
            object_id: fields.number("objectId")?,
            change_source: fields.string("changeSource")?,
            change_flag: fields.string("changeFlag")?,
            object_type_id: fields.string("objectTypeId")?,
            property_name: fields.optional_string("propertyName"),
            property_value: fields.optional_string("propertyValue"),
        })
    }

    /// Whether this notification describes a single property change
    pub fn is_property_change(&self) -> bool {
        self.property_name.is_some()
    }

    /// Time the change occurred, if `occurred_at` is a representable instant
    ///
    /// Fractional milliseconds are truncated.
    pub fn occurred_at_utc(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        let millis = match self.occurred_at.as_i64() {
            Some(millis) => millis,
            None => {
                let millis = self.occurred_at.as_f64()?;
                if !(i64::MIN as f64..=i64::MAX as f64).contains(&millis) {
                    return None;
                }
                millis.trunc() as i64
            }
        };
        chrono::DateTime::from_timestamp_millis(millis)
    }
}

impl TryFrom<&Value> for WebhookEvent {
    type Error = PayloadError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

/// Check whether a JSON value has the shape of a [`WebhookEvent`]
pub fn validate_webhook_payload(value: &Value) -> bool {
    WebhookEvent::from_value(value).is_ok()
}

// ============================================================================
// Errors
// ============================================================================

/// Primitive kind expected for a required field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Number => write!(f, "number"),
        }
    }
}

/// Reasons a payload is not a valid [`WebhookEvent`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    #[error("Payload must be a JSON object, got {actual}")]
    NotAnObject { actual: &'static str },

    #[error("Field '{field}' is required")]
    MissingField { field: &'static str },

    #[error("Field '{field}' must be {expected}, got {actual}")]
    WrongType {
        field: &'static str,
        expected: FieldKind,
        actual: &'static str,
    },
}

impl PayloadError {
    /// Name of the offending field, if the failure is field-specific
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::NotAnObject { .. } => None,
            Self::MissingField { field } | Self::WrongType { field, .. } => Some(*field),
        }
    }
}

// ============================================================================
// Private helpers
// ============================================================================

struct FieldReader<'a> {
    object: &'a Map<String, Value>,
}

impl FieldReader<'_> {
    fn get(&self, field: &'static str) -> Result<&Value, PayloadError> {
        self.object
            .get(field)
            .ok_or(PayloadError::MissingField { field })
    }

    fn string(&self, field: &'static str) -> Result<String, PayloadError> {
        match self.get(field)? {
            Value::String(s) => Ok(s.clone()),
            other => Err(PayloadError::WrongType {
                field,
                expected: FieldKind::String,
                actual: json_type_name(other),
            }),
        }
    }

    fn number(&self, field: &'static str) -> Result<Number, PayloadError> {
        match self.get(field)? {
            Value::Number(n) => Ok(n.clone()),
            other => Err(PayloadError::WrongType {
                field,
                expected: FieldKind::Number,
                actual: json_type_name(other),
            }),
        }
    }

    // Present-but-mistyped optional fields are dropped, not rejected.
    fn optional_string(&self, field: &'static str) -> Option<String> {
        self.object
            .get(field)
            .and_then(Value::as_str)
            .map(str::to_owned)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
