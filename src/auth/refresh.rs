//! Refresh tokens
//!
//! Refresh tokens are opaque: 32 bytes from the OS CSPRNG, hex encoded. All
//! of their meaning lives in the store row ([`RefreshTokenRecord`]).

use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, RngCore};

use crate::types::{AuthError, UserId};

/// Number of random bytes in a refresh token
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Lifetime of a refresh token
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 60;

/// Mint a new refresh token
///
/// A failing randomness source is reported as [`AuthError::Entropy`], which is
/// fatal: there is no fallback RNG.
pub fn make_refresh_token() -> Result<String, AuthError> {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| AuthError::Entropy(e.to_string()))?;
    Ok(hex::encode(bytes))
}

/// Where a refresh token is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTokenState {
    Active,
    Expired,
    Revoked,
}

/// Stored refresh token row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenRecord {
    pub token: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshTokenRecord {
    /// New active record expiring [`REFRESH_TOKEN_TTL_DAYS`] after `now`
    pub fn new(token: String, user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            token,
            user_id,
            created_at: now,
            updated_at: now,
            expires_at: now + Duration::days(REFRESH_TOKEN_TTL_DAYS),
            revoked_at: None,
        }
    }

    /// Revocation wins over expiry
    pub fn state(&self, now: DateTime<Utc>) -> RefreshTokenState {
        if self.revoked_at.is_some() {
            RefreshTokenState::Revoked
        } else if now >= self.expires_at {
            RefreshTokenState::Expired
        } else {
            RefreshTokenState::Active
        }
    }

    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.state(now) == RefreshTokenState::Active
    }

    /// Mark revoked; revoking twice keeps the first timestamp
    pub fn revoke(&mut self, now: DateTime<Utc>) {
        if self.revoked_at.is_none() {
            self.revoked_at = Some(now);
            self.updated_at = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_token_shape() {
        let token = make_refresh_token().unwrap();
        assert_eq!(token.len(), REFRESH_TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_successive_tokens_differ() {
        let tokens: HashSet<String> = (0..64).map(|_| make_refresh_token().unwrap()).collect();
        assert_eq!(tokens.len(), 64);
    }

    #[test]
    fn test_record_lifecycle() {
        let now = Utc::now();
        let mut record = RefreshTokenRecord::new("abc".into(), UserId::new_v4(), now);

        assert_eq!(record.expires_at - record.created_at, Duration::days(60));
        assert_eq!(record.state(now), RefreshTokenState::Active);
        assert!(record.is_usable(now + Duration::days(59)));

        assert_eq!(
            record.state(now + Duration::days(60)),
            RefreshTokenState::Expired
        );

        let revoked_at = now + Duration::minutes(5);
        record.revoke(revoked_at);
        assert_eq!(record.state(now + Duration::minutes(6)), RefreshTokenState::Revoked);
        assert!(!record.is_usable(now + Duration::minutes(6)));
        assert_eq!(record.updated_at, revoked_at);
    }

    #[test]
    fn test_revoke_is_idempotent() {
        let now = Utc::now();
        let mut record = RefreshTokenRecord::new("abc".into(), UserId::new_v4(), now);

        record.revoke(now + Duration::seconds(1));
        record.revoke(now + Duration::seconds(2));
        assert_eq!(record.revoked_at, Some(now + Duration::seconds(1)));
    }

    #[test]
    fn test_revoked_after_expiry_reports_revoked() {
        let now = Utc::now();
        let mut record = RefreshTokenRecord::new("abc".into(), UserId::new_v4(), now);
        let later = now + Duration::days(90);
        record.revoke(later);
        assert_eq!(record.state(later), RefreshTokenState::Revoked);
    }
}
