//! Convenience result type alias for OrgGuard.

use crate::error::AppError;

/// A specialized `Result` type for OrgGuard operations.
pub type AppResult<T> = Result<T, AppError>;
