//! Login, refresh and revoke flows
//!
//! Glues the password hasher, token codec and refresh token generator to a
//! [`CredentialStore`]. Refresh tokens are not rotated: `refresh` only mints a
//! new access token, and a user may hold any number of live refresh tokens.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::jwt::TokenCodec;
use super::password::verify_password;
use super::refresh::{make_refresh_token, RefreshTokenRecord};
use crate::store::CredentialStore;
use crate::types::{ChirpyError, Result, User};

/// Message for any failed login, whichever half of the credential was wrong
pub const LOGIN_FAILED_MESSAGE: &str = "Incorrect email or password";

/// Message for a refresh token that is missing, expired or revoked
pub const INVALID_REFRESH_MESSAGE: &str = "Invalid token";

/// Well-formed argon2id hash (default parameters) that matches no password.
/// Unknown emails are verified against it so both login failures cost one
/// argon2 run.
pub(crate) const DUMMY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$Y2hpcnB5LWR1bW15LXNsdA$AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8";

/// Everything handed back on a successful login
#[derive(Debug, Clone)]
pub struct LoginGrant {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn CredentialStore>,
    codec: TokenCodec,
}

impl SessionService {
    pub fn new(store: Arc<dyn CredentialStore>, codec: TokenCodec) -> Self {
        Self { store, codec }
    }

    /// Check email and password, then mint an access and a refresh token
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginGrant> {
        let Some(user) = self.store.get_user_by_email(email).await? else {
            let _ = verify_password(password, DUMMY_PASSWORD_HASH);
            warn!("Login rejected: unknown email");
            return Err(login_failed());
        };

        if !verify_password(password, &user.hashed_password)? {
            warn!(user_id = %user.id, "Login rejected: wrong password");
            return Err(login_failed());
        }

        let access_token = self.codec.issue(user.id)?;
        let refresh_token = make_refresh_token()?;
        self.store
            .create_refresh_token(RefreshTokenRecord::new(
                refresh_token.clone(),
                user.id,
                Utc::now(),
            ))
            .await?;

        info!(user_id = %user.id, "User logged in");
        Ok(LoginGrant {
            user,
            access_token,
            refresh_token,
        })
    }

    /// Exchange a usable refresh token for a new access token
    pub async fn refresh(&self, refresh_token: &str) -> Result<String> {
        let Some(user) = self.store.get_user_by_refresh_token(refresh_token).await? else {
            let state = self
                .store
                .get_refresh_token(refresh_token)
                .await?
                .map(|record| record.state(Utc::now()));
            debug!(?state, "Refresh rejected");
            return Err(ChirpyError::Unauthorized(INVALID_REFRESH_MESSAGE.into()));
        };

        Ok(self.codec.issue(user.id)?)
    }

    /// Revoke a refresh token; unknown tokens are silently accepted
    pub async fn revoke(&self, refresh_token: &str) -> Result<()> {
        if self.store.revoke_refresh_token(refresh_token).await? {
            info!("Refresh token revoked");
        } else {
            debug!("Revoke requested for unknown refresh token");
        }
        Ok(())
    }
}

fn login_failed() -> ChirpyError {
    ChirpyError::Unauthorized(LOGIN_FAILED_MESSAGE.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;
    use crate::store::MemoryStore;
    use std::time::Duration;
    use tokio_test::{assert_err, assert_ok};

    const SECRET: &str = "session-test-secret-at-least-32-bytes";

    async fn setup() -> (SessionService, Arc<MemoryStore>, User) {
        let store = Arc::new(MemoryStore::new());
        let user = store
            .create_user("walt@breakingbad.com", &hash_password("04234").unwrap())
            .await
            .unwrap();
        let service = SessionService::new(
            store.clone(),
            TokenCodec::new(SECRET, Duration::from_secs(3600)),
        );
        (service, store, user)
    }

    #[tokio::test]
    async fn test_login_success() {
        let (service, store, user) = setup().await;

        let grant = assert_ok!(service.login("walt@breakingbad.com", "04234").await);
        assert_eq!(grant.user.id, user.id);
        assert_eq!(service.codec.verify(&grant.access_token).unwrap(), user.id);
        assert_eq!(grant.refresh_token.len(), 64);
        assert_eq!(store.refresh_token_count(), 1);
    }

    #[tokio::test]
    async fn test_login_failures_share_message() {
        let (service, _, _) = setup().await;

        for (email, password) in [
            ("walt@breakingbad.com", "wrong"),
            ("nobody@breakingbad.com", "04234"),
        ] {
            match service.login(email, password).await {
                Err(ChirpyError::Unauthorized(msg)) => assert_eq!(msg, LOGIN_FAILED_MESSAGE),
                other => panic!("unexpected login result: {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_corrupt_stored_hash_is_internal() {
        let store = Arc::new(MemoryStore::new());
        store.create_user("a@example.com", "not-a-phc-string").await.unwrap();
        let service = SessionService::new(store, TokenCodec::new(SECRET, Duration::from_secs(60)));

        let err = assert_err!(service.login("a@example.com", "pw").await);
        assert!(matches!(err, ChirpyError::Internal(_)));
    }

    #[tokio::test]
    async fn test_each_login_gets_its_own_refresh_token() {
        let (service, store, _) = setup().await;

        let first = service.login("walt@breakingbad.com", "04234").await.unwrap();
        let second = service.login("walt@breakingbad.com", "04234").await.unwrap();
        assert_ne!(first.refresh_token, second.refresh_token);
        assert_eq!(store.refresh_token_count(), 2);

        // Both stay usable
        assert_ok!(service.refresh(&first.refresh_token).await);
        assert_ok!(service.refresh(&second.refresh_token).await);
    }

    #[tokio::test]
    async fn test_refresh_then_revoke() {
        let (service, _, user) = setup().await;
        let grant = service.login("walt@breakingbad.com", "04234").await.unwrap();

        let access = service.refresh(&grant.refresh_token).await.unwrap();
        assert_eq!(service.codec.verify(&access).unwrap(), user.id);

        assert_ok!(service.revoke(&grant.refresh_token).await);
        match service.refresh(&grant.refresh_token).await {
            Err(ChirpyError::Unauthorized(msg)) => assert_eq!(msg, INVALID_REFRESH_MESSAGE),
            other => panic!("revoked token was accepted: {:?}", other),
        }
    }

    #[test]
    fn test_dummy_hash_runs_full_verification() {
        // Must parse and run argon2, never error out early or match
        assert_eq!(verify_password("04234", DUMMY_PASSWORD_HASH), Ok(false));
        assert_eq!(verify_password("", DUMMY_PASSWORD_HASH), Ok(false));
    }

    #[tokio::test]
    async fn test_expired_refresh_token_rejected() {
        let (service, store, user) = setup().await;
        let issued = Utc::now() - chrono::Duration::days(61);
        store
            .create_refresh_token(RefreshTokenRecord::new("stale".into(), user.id, issued))
            .await
            .unwrap();

        match service.refresh("stale").await {
            Err(ChirpyError::Unauthorized(msg)) => assert_eq!(msg, INVALID_REFRESH_MESSAGE),
            other => panic!("expired token was accepted: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_revoke_unknown_token_is_ok() {
        let (service, _, _) = setup().await;
        assert_ok!(service.revoke("does-not-exist").await);
        assert_err!(service.refresh("does-not-exist").await);
    }
}
