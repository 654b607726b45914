//! Access token issuing and verification
//!
//! Access tokens are JWTs signed with HS256 (HMAC-SHA256) using a single
//! server-held secret. They are stateless: nothing about an issued token is
//! stored, and each request re-verifies signature, issuer and expiry.
//!
//! Security notes:
//! - Expiry is checked with zero leeway against the verifier's clock
//! - Only HS256 is accepted; `alg: none` and asymmetric algorithms are rejected
//! - Signature is checked before expiry, so a forged token never reports `Expired`

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::types::{AuthError, UserId};

/// Issuer embedded in and required of every access token
pub const TOKEN_ISSUER: &str = "chirpy";

/// Payload stored in the access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer, always [`TOKEN_ISSUER`]
    pub iss: String,
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Issue an access token for `subject`, valid for `ttl` from now
pub fn issue_access_token(subject: UserId, secret: &str, ttl: Duration) -> Result<String, AuthError> {
    issue_access_token_at(subject, secret, ttl, Utc::now())
}

/// Issue an access token as if it had been minted at `issued_at`
pub(crate) fn issue_access_token_at(
    subject: UserId,
    secret: &str,
    ttl: Duration,
    issued_at: DateTime<Utc>,
) -> Result<String, AuthError> {
    let ttl = chrono::Duration::from_std(ttl)
        .map_err(|e| AuthError::Signing(format!("token lifetime out of range: {e}")))?;
    let expires_at = issued_at
        .checked_add_signed(ttl)
        .ok_or_else(|| AuthError::Signing("token expiry overflows".into()))?;

    let claims = Claims {
        iss: TOKEN_ISSUER.to_string(),
        sub: subject.to_string(),
        iat: issued_at.timestamp(),
        exp: expires_at.timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::Signing(format!("failed to generate token: {e}")))
}

/// Verify an access token and return its subject
pub fn verify_access_token(token: &str, secret: &str) -> Result<UserId, AuthError> {
    let claims = decode_claims(token, secret)?;
    claims.sub.parse().map_err(|_| AuthError::Malformed)
}

/// Verify an access token and return all of its claims
pub fn decode_claims(token: &str, secret: &str) -> Result<Claims, AuthError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation(),
    )
    .map(|data| data.claims)
    .map_err(|err| match err.kind() {
        ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        ErrorKind::ExpiredSignature => AuthError::Expired,
        _ => AuthError::Malformed,
    })
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.validate_exp = true;
    validation.set_issuer(&[TOKEN_ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);
    validation
}

/// Access token issuer/verifier bound to one secret and lifetime
#[derive(Clone)]
pub struct TokenCodec {
    secret: String,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: impl Into<String>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }

    pub fn issue(&self, subject: UserId) -> Result<String, AuthError> {
        issue_access_token(subject, &self.secret, self.ttl)
    }

    pub fn verify(&self, token: &str) -> Result<UserId, AuthError> {
        verify_access_token(token, &self.secret)
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}
