//! Convenience result type alias for Libris.

use crate::error::AppError;

/// A specialized `Result` type for Libris operations.
pub type AppResult<T> = Result<T, AppError>;
