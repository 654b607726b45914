//! In-memory credential store
//!
//! Three `DashMap`s: users by id, an email index, and refresh tokens by
//! value. Email uniqueness is enforced through the index entry API so two
//! concurrent sign-ups with the same address cannot both win.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;

use super::CredentialStore;
use crate::auth::refresh::RefreshTokenRecord;
use crate::types::{ChirpyError, Result, User, UserId};

#[derive(Debug, Default)]
pub struct MemoryStore {
    users: DashMap<UserId, User>,
    emails: DashMap<String, UserId>,
    refresh_tokens: DashMap<String, RefreshTokenRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn refresh_token_count(&self) -> usize {
        self.refresh_tokens.len()
    }
}

fn email_taken() -> ChirpyError {
    ChirpyError::Conflict("Email already registered".into())
}

fn user_not_found() -> ChirpyError {
    ChirpyError::NotFound("User not found".into())
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User> {
        let user = User::new(email.to_string(), hashed_password.to_string());

        // Lock order is always users then emails
        let Entry::Vacant(row) = self.users.entry(user.id) else {
            return Err(ChirpyError::Internal("user id collision".into()));
        };
        match self.emails.entry(email.to_string()) {
            Entry::Occupied(_) => return Err(email_taken()),
            Entry::Vacant(slot) => {
                slot.insert(user.id);
            }
        }
        row.insert(user.clone());

        debug!(user_id = %user.id, "Created user");
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let Some(id) = self.emails.get(email).map(|id| *id) else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|user| user.clone()))
    }

    async fn update_user(&self, id: UserId, email: &str, hashed_password: &str) -> Result<User> {
        // The row stays locked across the index swap so concurrent updates of
        // one user cannot each leave an index entry behind
        let mut user = self.users.get_mut(&id).ok_or_else(user_not_found)?;

        if user.email != email {
            match self.emails.entry(email.to_string()) {
                Entry::Occupied(_) => return Err(email_taken()),
                Entry::Vacant(slot) => {
                    slot.insert(id);
                }
            }
            self.emails.remove(&user.email);
        }

        user.email = email.to_string();
        user.hashed_password = hashed_password.to_string();
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn upgrade_user(&self, id: UserId) -> Result<User> {
        let mut user = self.users.get_mut(&id).ok_or_else(user_not_found)?;
        user.is_chirpy_red = true;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn create_refresh_token(&self, record: RefreshTokenRecord) -> Result<()> {
        match self.refresh_tokens.entry(record.token.clone()) {
            Entry::Occupied(_) => Err(ChirpyError::Conflict("Refresh token already exists".into())),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    async fn get_user_by_refresh_token(&self, token: &str) -> Result<Option<User>> {
        let now = Utc::now();
        let Some(user_id) = self
            .refresh_tokens
            .get(token)
            .filter(|record| record.is_usable(now))
            .map(|record| record.user_id)
        else {
            return Ok(None);
        };
        Ok(self.users.get(&user_id).map(|user| user.clone()))
    }

    async fn get_refresh_token(&self, token: &str) -> Result<Option<RefreshTokenRecord>> {
        Ok(self.refresh_tokens.get(token).map(|record| record.clone()))
    }

    async fn revoke_refresh_token(&self, token: &str) -> Result<bool> {
        match self.refresh_tokens.get_mut(token) {
            Some(mut record) => {
                record.revoke(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn reset(&self) -> Result<()> {
        self.refresh_tokens.clear();
        self.users.clear();
        self.emails.clear();
        debug!("Store reset");
        Ok(())
    }
}
