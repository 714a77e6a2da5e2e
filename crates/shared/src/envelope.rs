//! The uniform response envelope returned by every backend endpoint.

use serde::{Deserialize, Serialize};

/// Field-level validation failure reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the offending request field.
    pub field: String,
    /// Human-readable description of the problem.
    pub message: String,
}

/// `{success, message, data?, code?, errors?}` wrapper around every payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Whether the backend considers the call successful.
    pub success: bool,
    /// Message suitable for display.
    #[serde(default)]
    pub message: String,
    /// Payload, present on most successful calls.
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Machine-readable error code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Field-level validation errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl<T> ApiEnvelope<T> {
    /// Builds a successful envelope carrying `data`.
    #[must_use]
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            code: None,
            errors: None,
        }
    }

    /// Builds a failed envelope with no payload.
    #[must_use]
    pub fn failure(message: impl Into<String>, code: Option<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            code,
            errors: None,
        }
    }

    /// Returns the field errors, empty when none were reported.
    #[must_use]
    pub fn field_errors(&self) -> &[FieldError] {
        self.errors.as_deref().unwrap_or_default()
    }
}
