//! Convenience result type alias for CivicHub.

use crate::error::AppError;

/// A specialized `Result` type for CivicHub operations.
pub type AppResult<T> = Result<T, AppError>;
