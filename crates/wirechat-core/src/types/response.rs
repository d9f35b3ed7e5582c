//! Standard API response envelope.

use serde::{Deserialize, Serialize};

/// Envelope wrapping most backend responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Payload, present on success.
    pub data: Option<T>,
    /// Optional human-readable message.
    pub message: Option<String>,
    /// Optional machine-readable error code.
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload, converting an unsuccessful envelope into an error.
    pub fn into_data(self) -> Result<T, crate::error::AppError> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => {
                let mut err = crate::error::AppError::validation(
                    self.message
                        .unwrap_or_else(|| "Invalid response envelope".to_string()),
                );
                if let Some(code) = self.error {
                    err = err.with_code(code);
                }
                Err(err)
            }
        }
    }
}
