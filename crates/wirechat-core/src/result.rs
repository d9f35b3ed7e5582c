//! Convenience result type alias for WireChat.

use crate::error::AppError;

/// A specialized `Result` type for WireChat operations.
pub type AppResult<T> = Result<T, AppError>;
