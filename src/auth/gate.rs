//! Request authentication
//!
//! The gate turns an `Authorization` header into a principal. Every failure,
//! whatever its cause, leaves as the same `401 Unauthorized`; the real reason
//! only goes to the debug log.

use hyper::HeaderMap;
use tracing::debug;

use super::api_key::ApiKeyValidator;
use super::header::{get_api_key, get_bearer_token};
use super::jwt::TokenCodec;
use crate::types::{AuthError, ChirpyError, UserId, UNAUTHORIZED_MESSAGE};

/// Who a request was authenticated as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Principal {
    /// Holder of a valid access token
    User(UserId),
    /// Caller presenting the webhook API key
    Webhook,
}

impl Principal {
    /// The authenticated user, for routes that act on the caller's account
    pub fn user_id(self) -> Result<UserId, ChirpyError> {
        match self {
            Self::User(id) => Ok(id),
            Self::Webhook => {
                debug!("Webhook principal used on a user route");
                Err(unauthorized())
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthGate {
    codec: TokenCodec,
    api_key: ApiKeyValidator,
}

impl AuthGate {
    pub fn new(codec: TokenCodec, api_key: ApiKeyValidator) -> Self {
        Self { codec, api_key }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Resolve `Authorization: Bearer <access token>` to a user
    pub fn authenticate_bearer(&self, headers: &HeaderMap) -> Result<Principal, ChirpyError> {
        get_bearer_token(headers)
            .and_then(|token| self.codec.verify(token))
            .map(Principal::User)
            .map_err(|e| masked("bearer", e))
    }

    /// Check `Authorization: ApiKey <key>` against the configured webhook key
    pub fn authenticate_api_key(&self, headers: &HeaderMap) -> Result<Principal, ChirpyError> {
        let key = get_api_key(headers).map_err(|e| masked("api key", e))?;

        if self.api_key.validate(key) {
            Ok(Principal::Webhook)
        } else {
            debug!(scheme = "api key", "Authentication failed: key mismatch");
            Err(unauthorized())
        }
    }
}

fn masked(scheme: &'static str, err: AuthError) -> ChirpyError {
    debug!(scheme, reason = %err, "Authentication failed");
    ChirpyError::from(err)
}

fn unauthorized() -> ChirpyError {
    ChirpyError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string())
}
