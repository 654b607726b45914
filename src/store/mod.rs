//! Credential storage
//!
//! Users and refresh tokens live behind [`CredentialStore`] so handlers and
//! the session service never depend on a concrete backend. [`MemoryStore`] is
//! the only implementation shipped here.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::auth::refresh::RefreshTokenRecord;
use crate::types::{Result, User, UserId};

/// Backend for user accounts and refresh tokens
///
/// Implementations own the atomicity of each call: email uniqueness on
/// create/update, and revoke being a single compare-and-set.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a new user. Fails with `Conflict` if the email is taken.
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Replace email and password hash. `NotFound` for an unknown id,
    /// `Conflict` if the new email belongs to someone else.
    async fn update_user(&self, id: UserId, email: &str, hashed_password: &str) -> Result<User>;

    /// Set the paid-tier flag. `NotFound` for an unknown id.
    async fn upgrade_user(&self, id: UserId) -> Result<User>;

    async fn create_refresh_token(&self, record: RefreshTokenRecord) -> Result<()>;

    /// Owner of `token` if the token exists, is unexpired and unrevoked
    async fn get_user_by_refresh_token(&self, token: &str) -> Result<Option<User>>;

    /// Raw row lookup regardless of state
    async fn get_refresh_token(&self, token: &str) -> Result<Option<RefreshTokenRecord>>;

    /// Mark `token` revoked. Returns whether a row was found; revoking an
    /// already revoked token keeps the original timestamp.
    async fn revoke_refresh_token(&self, token: &str) -> Result<bool>;

    /// Drop every user and refresh token
    async fn reset(&self) -> Result<()>;
}
