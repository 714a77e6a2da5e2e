//! Client-wide error types.
//!
//! Every failure a backend call can produce is folded into [`ApiError`]; callers
//! receive it as a value and decide how to present it.

use thiserror::Error;

use crate::envelope::FieldError;

/// Result type alias using `ApiError`.
pub type ApiResult<T> = Result<T, ApiError>;

/// Failure classes surfaced by backend calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No response was received.
    Network,
    /// The backend rejected the credentials (401/403).
    Auth,
    /// A 4xx response carrying field-level errors.
    Validation,
    /// A 5xx response or any other generic failure.
    Server,
}

impl ErrorKind {
    /// Classifies an HTTP status plus the presence of field errors.
    #[must_use]
    pub const fn from_status(status: u16, has_field_errors: bool) -> Self {
        match status {
            401 | 403 => Self::Auth,
            400..=499 if has_field_errors => Self::Validation,
            _ => Self::Server,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network => write!(f, "network"),
            Self::Auth => write!(f, "auth"),
            Self::Validation => write!(f, "validation"),
            Self::Server => write!(f, "server"),
        }
    }
}

/// Structured failure of a backend call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} error: {message}")]
pub struct ApiError {
    /// Failure class.
    pub kind: ErrorKind,
    /// HTTP status, absent when no response was received.
    pub status: Option<u16>,
    /// Message suitable for display.
    pub message: String,
    /// Machine-readable code from the envelope, if any.
    pub code: Option<String>,
    /// Field-level validation errors.
    pub field_errors: Vec<FieldError>,
}

impl ApiError {
    /// A transport failure: the request never produced a response.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Network,
            status: None,
            message: message.into(),
            code: None,
            field_errors: Vec::new(),
        }
    }

    /// A generic failure not tied to a specific status.
    #[must_use]
    pub fn server(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Server,
            status: None,
            message: message.into(),
            code: None,
            field_errors: Vec::new(),
        }
    }

    /// A client-side validation failure on a single field.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: ErrorKind::Validation,
            status: None,
            message: message.clone(),
            code: Some("VALIDATION_ERROR".to_string()),
            field_errors: vec![FieldError {
                field: field.into(),
                message,
            }],
        }
    }

    /// Authentication is required but no session exists.
    #[must_use]
    pub fn unauthenticated() -> Self {
        Self {
            kind: ErrorKind::Auth,
            status: Some(401),
            message: "Not authenticated".to_string(),
            code: Some("UNAUTHORIZED".to_string()),
            field_errors: Vec::new(),
        }
    }

    /// Builds an error from an HTTP response status and its decoded envelope.
    #[must_use]
    pub fn from_response(
        status: u16,
        message: String,
        code: Option<String>,
        field_errors: Vec<FieldError>,
    ) -> Self {
        Self {
            kind: ErrorKind::from_status(status, !field_errors.is_empty()),
            status: Some(status),
            message,
            code,
            field_errors,
        }
    }

    /// Returns true for a 401 response.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(401)
    }

    /// Returns the HTTP status code for this error, 0 when none was received.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status.unwrap_or(0)
    }

    /// Returns the error code for display, falling back to the kind.
    #[must_use]
    pub fn error_code(&self) -> &str {
        match (&self.code, self.kind) {
            (Some(code), _) => code,
            (None, ErrorKind::Network) => "NETWORK_ERROR",
            (None, ErrorKind::Auth) => "UNAUTHORIZED",
            (None, ErrorKind::Validation) => "VALIDATION_ERROR",
            (None, ErrorKind::Server) => "SERVER_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(401, false, ErrorKind::Auth)]
    #[case(403, true, ErrorKind::Auth)]
    #[case(400, true, ErrorKind::Validation)]
    #[case(422, true, ErrorKind::Validation)]
    #[case(404, false, ErrorKind::Server)]
    #[case(500, false, ErrorKind::Server)]
    #[case(503, true, ErrorKind::Server)]
    fn test_kind_from_status(
        #[case] status: u16,
        #[case] has_field_errors: bool,
        #[case] expected: ErrorKind,
    ) {
        assert_eq!(ErrorKind::from_status(status, has_field_errors), expected);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ApiError::network("down").error_code(), "NETWORK_ERROR");
        assert_eq!(ApiError::server("boom").error_code(), "SERVER_ERROR");
        assert_eq!(ApiError::unauthenticated().error_code(), "UNAUTHORIZED");

        let with_code =
            ApiError::from_response(409, "taken".into(), Some("EMAIL_TAKEN".into()), Vec::new());
        assert_eq!(with_code.error_code(), "EMAIL_TAKEN");
    }

    #[test]
    fn test_validation_carries_field() {
        let error = ApiError::validation("amount", "Amount must be positive");
        assert_eq!(error.kind, ErrorKind::Validation);
        assert_eq!(error.field_errors[0].field, "amount");
        assert_eq!(error.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_status_code() {
        assert_eq!(ApiError::network("down").status_code(), 0);
        assert_eq!(ApiError::unauthenticated().status_code(), 401);
        assert!(ApiError::unauthenticated().is_unauthorized());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ApiError::network("connection refused").to_string(),
            "network error: connection refused"
        );
        assert_eq!(
            ApiError::server("msg").to_string(),
            "server error: msg"
        );
    }
}
