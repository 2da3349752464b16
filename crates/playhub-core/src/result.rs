//! Convenience result type alias for PlayHub.

use crate::error::AppError;

/// A specialized `Result` type for PlayHub operations.
///
/// Defined so that every crate does not need to spell out
/// `Result<T, AppError>` at each call site.
pub type AppResult<T> = Result<T, AppError>;
