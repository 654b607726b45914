//! Error types for Chirpy
//!
//! Two layers:
//! - [`AuthError`] is the typed taxonomy produced by the auth core
//!   (header parsing, token verification, hashing, randomness).
//! - [`ChirpyError`] is what handlers return and what gets turned into an
//!   HTTP response.
//!
//! `From<AuthError> for ChirpyError` is the one place where auth failures are
//! collapsed into client-visible errors. Header and token failures all become
//! the same `Unauthorized` so a caller cannot tell which check rejected them.

use hyper::StatusCode;

/// Message returned for every masked authentication failure
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

/// Failures raised by the auth core
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("authorization header missing")]
    MissingHeader,

    #[error("authorization header malformed")]
    MalformedHeader,

    #[error("token signature invalid")]
    InvalidSignature,

    #[error("token expired")]
    Expired,

    #[error("token malformed")]
    Malformed,

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("token signing failed: {0}")]
    Signing(String),

    #[error("randomness source failed: {0}")]
    Entropy(String),
}

impl AuthError {
    /// True for failures the process cannot recover from
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Entropy(_))
    }
}

/// Main error type for Chirpy operations
#[derive(Debug, thiserror::Error)]
pub enum ChirpyError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Fatal error: {0}")]
    Fatal(String),
}

impl ChirpyError {
    /// Convert error to HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Http(_) => StatusCode::BAD_REQUEST,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Fatal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message that is safe to put in a response body
    ///
    /// Server-side failures never echo their detail.
    pub fn client_message(&self) -> String {
        match self {
            Self::BadRequest(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg)
            | Self::Conflict(msg)
            | Self::Http(msg) => msg.clone(),
            Self::Config(_) | Self::Internal(_) | Self::Fatal(_) => {
                "Internal server error".to_string()
            }
        }
    }

    /// True when the process should stop serving after this error
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }
}

impl From<AuthError> for ChirpyError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingHeader
            | AuthError::MalformedHeader
            | AuthError::InvalidSignature
            | AuthError::Expired
            | AuthError::Malformed => Self::Unauthorized(UNAUTHORIZED_MESSAGE.to_string()),
            AuthError::Hashing(_) | AuthError::Signing(_) => Self::Internal(err.to_string()),
            AuthError::Entropy(_) => Self::Fatal(err.to_string()),
        }
    }
}

impl From<std::io::Error> for ChirpyError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Result type alias for Chirpy operations
pub type Result<T> = std::result::Result<T, ChirpyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_failures_are_masked() {
        for err in [
            AuthError::MissingHeader,
            AuthError::MalformedHeader,
            AuthError::InvalidSignature,
            AuthError::Expired,
            AuthError::Malformed,
        ] {
            let mapped = ChirpyError::from(err);
            assert_eq!(mapped.status_code(), StatusCode::UNAUTHORIZED);
            assert_eq!(mapped.client_message(), UNAUTHORIZED_MESSAGE);
        }
    }

    #[test]
    fn test_internal_detail_not_exposed() {
        let err = ChirpyError::from(AuthError::Hashing("salt generation failed".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.client_message(), "Internal server error");
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_entropy_failure_is_fatal() {
        let auth = AuthError::Entropy("os rng unavailable".into());
        assert!(auth.is_fatal());

        let err = ChirpyError::from(auth);
        assert!(err.is_fatal());
        assert_eq!(err.client_message(), "Internal server error");
    }
}
