//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Validation and business-rule errors carry a specific, user-facing message
/// and are never retryable. Remote errors are opaque and retry-suggesting;
/// the caller's prior state is guaranteed intact when one is returned.
#[derive(Debug, Error)]
pub enum AppError {
    /// Input failed validation before any remote write was attempted.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Business rule violation.
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Remote persistence call failed; no local state was changed.
    #[error("Remote call failed: {0}")]
    Remote(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the error code for UI message mapping.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Remote(_) => "REMOTE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if the caller may usefully retry the operation.
    ///
    /// Only remote failures are retryable; validation and rule violations
    /// will fail identically on every attempt.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}
