use thiserror::Error;

/// Reasons an identity could not be established.
///
/// Messages are fixed so a caller can't tell which check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub(crate) enum AuthFailure {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid or expired token")]
    InvalidToken,
}

#[derive(Debug, Error)]
pub(crate) enum DomainError {
    #[error("validation failed for '{field}': {message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },

    #[error("resource already exists: {0}")]
    Conflict(String),

    #[error(transparent)]
    Auth(#[from] AuthFailure),

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("unexpected domain error: {0}")]
    Unexpected(String),
}

impl DomainError {
    pub(crate) fn invalid_credentials() -> Self {
        Self::Auth(AuthFailure::InvalidCredentials)
    }

    pub(crate) fn invalid_token() -> Self {
        Self::Auth(AuthFailure::InvalidToken)
    }
}
