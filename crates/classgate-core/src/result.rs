//! Convenience result type alias for ClassGate.

use crate::error::AppError;

/// A specialized `Result` type for ClassGate operations.
pub type AppResult<T> = Result<T, AppError>;
