//! Unified application error types for WireChat.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. Every backend rejection is normalized
//! into exactly one [`ErrorKind`] before it reaches a caller.

use std::fmt;

use thiserror::Error;

/// Sentinel status used when no response was received from the backend.
///
/// Distinguishes transport-level failures from server-side rejections,
/// which always carry a real HTTP status.
pub const STATUS_NO_RESPONSE: u16 = 0;

/// Top-level error kind categorization used across the entire client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Credential invalid or expired and refresh also failed; the user must
    /// re-authenticate.
    Unauthorized,
    /// The caller is authenticated but not allowed to perform the action.
    Forbidden,
    /// The requested resource was not found.
    NotFound,
    /// A conflict occurred (duplicate entry, concurrent modification, etc.).
    Conflict,
    /// Input validation failed; may carry a field-level detail payload.
    Validation,
    /// The backend answered with a 5xx status.
    Server,
    /// No response was received from the backend at all.
    NetworkUnreachable,
    /// The request failed before it was even dispatched.
    RequestMisconfigured,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// A realtime (WebSocket) transport error occurred.
    Realtime,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "UNAUTHORIZED"),
            Self::Forbidden => write!(f, "FORBIDDEN"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Server => write!(f, "SERVER"),
            Self::NetworkUnreachable => write!(f, "NETWORK_UNREACHABLE"),
            Self::RequestMisconfigured => write!(f, "REQUEST_MISCONFIGURED"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Realtime => write!(f, "REALTIME"),
        }
    }
}

/// The unified application error used throughout WireChat.
///
/// Carries the HTTP status that produced the error ([`STATUS_NO_RESPONSE`]
/// when no response was received), a human-readable message, an optional
/// machine-readable code from the backend, and an optional validation
/// detail payload.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// HTTP status that produced this error; 0 when no response arrived.
    pub status: u16,
    /// A human-readable error message.
    pub message: String,
    /// Optional machine-readable error code from the backend.
    pub code: Option<String>,
    /// Optional structured details (e.g. field-level validation errors).
    pub details: Option<serde_json::Value>,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, status: u16, message: impl Into<String>) -> Self {
        Self {
            kind,
            status,
            message: message.into(),
            code: None,
            details: None,
            source: None,
        }
    }

    /// Attach a machine-readable error code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attach a structured detail payload.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Attach an underlying cause.
    pub fn with_source(
        mut self,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create an unauthorized error (401).
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, 401, message)
    }

    /// Create a forbidden error (403).
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, 403, message)
    }

    /// Create a not-found error (404).
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, 404, message)
    }

    /// Create a conflict error (409).
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, 409, message)
    }

    /// Create a validation error (422).
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, 422, message)
    }

    /// Create a network-unreachable error (no response received).
    pub fn network_unreachable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NetworkUnreachable, STATUS_NO_RESPONSE, message)
    }

    /// Create a request-misconfigured error (failed before dispatch).
    pub fn request_misconfigured(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequestMisconfigured, STATUS_NO_RESPONSE, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, STATUS_NO_RESPONSE, message)
    }

    /// Create a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Serialization, STATUS_NO_RESPONSE, message)
    }

    /// Create a realtime transport error.
    pub fn realtime(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Realtime, STATUS_NO_RESPONSE, message)
    }

    /// Classify a server rejection by its HTTP status code.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let kind = match status {
            401 => ErrorKind::Unauthorized,
            403 => ErrorKind::Forbidden,
            404 => ErrorKind::NotFound,
            409 => ErrorKind::Conflict,
            400 | 422 => ErrorKind::Validation,
            _ => ErrorKind::Server,
        };
        Self::new(kind, status, message)
    }

    /// Normalize a backend rejection from its status and raw body.
    ///
    /// The backend error body is `{message, error, statusCode, errors}`;
    /// any of the fields may be missing and the body may not be JSON at all.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        #[derive(serde::Deserialize)]
        struct WireErrorBody {
            message: Option<String>,
            error: Option<String>,
            errors: Option<serde_json::Value>,
        }

        let parsed: Option<WireErrorBody> = serde_json::from_slice(body).ok();
        let (message, code, details) = match parsed {
            Some(b) => (b.message, b.error, b.errors),
            None => (None, None, None),
        };

        let mut err = Self::from_status(
            status,
            message.unwrap_or_else(|| format!("HTTP error {status}")),
        );
        if let Some(code) = code {
            err = err.with_code(code);
        }
        if let Some(details) = details {
            err = err.with_details(details);
        }
        err
    }

    /// Whether this error means the caller must re-authenticate.
    pub fn is_unauthorized(&self) -> bool {
        self.kind == ErrorKind::Unauthorized
    }

    /// Whether this error is a validation rejection.
    pub fn is_validation(&self) -> bool {
        self.kind == ErrorKind::Validation
    }

    /// Whether no response was received from the backend.
    pub fn is_network_unreachable(&self) -> bool {
        self.kind == ErrorKind::NetworkUnreachable
    }

    /// Whether the backend answered with a 5xx status.
    pub fn is_server_error(&self) -> bool {
        self.status >= 500
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            status: self.status,
            message: self.message.clone(),
            code: self.code.clone(),
            details: self.details.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON serialization error: {err}")).with_source(err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::configuration(format!("Configuration error: {err}")).with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_classification() {
        assert_eq!(AppError::from_status(401, "x").kind, ErrorKind::Unauthorized);
        assert_eq!(AppError::from_status(403, "x").kind, ErrorKind::Forbidden);
        assert_eq!(AppError::from_status(404, "x").kind, ErrorKind::NotFound);
        assert_eq!(AppError::from_status(409, "x").kind, ErrorKind::Conflict);
        assert_eq!(AppError::from_status(400, "x").kind, ErrorKind::Validation);
        assert_eq!(AppError::from_status(422, "x").kind, ErrorKind::Validation);
        assert_eq!(AppError::from_status(500, "x").kind, ErrorKind::Server);
        assert_eq!(AppError::from_status(503, "x").kind, ErrorKind::Server);
    }

    #[test]
    fn test_network_unreachable_sentinel() {
        let err = AppError::network_unreachable("no route to host");
        assert_eq!(err.status, STATUS_NO_RESPONSE);
        assert!(err.is_network_unreachable());
        assert!(!err.is_server_error());
    }

    #[test]
    fn test_from_response_parses_body() {
        let body = br#"{"message":"Email already taken","error":"CONFLICT","errors":{"email":["taken"]}}"#;
        let err = AppError::from_response(409, body);
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(err.message, "Email already taken");
        assert_eq!(err.code.as_deref(), Some("CONFLICT"));
        assert!(err.details.is_some());
    }

    #[test]
    fn test_from_response_non_json_body() {
        let err = AppError::from_response(502, b"Bad Gateway");
        assert_eq!(err.kind, ErrorKind::Server);
        assert_eq!(err.message, "HTTP error 502");
    }

    #[test]
    fn test_details_round_trip() {
        let err = AppError::validation("bad input")
            .with_code("VALIDATION_ERROR")
            .with_details(serde_json::json!({ "email": ["must be an email"] }));
        assert!(err.is_validation());
        assert_eq!(err.code.as_deref(), Some("VALIDATION_ERROR"));
        assert!(err.details.is_some());
    }
}
