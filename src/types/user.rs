//! User identity types
//!
//! `UserId` is the principal resolved by the auth gate. `User` is the account
//! row owned by the credential store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// User identifier (UUID v4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a fresh random ID
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// User account as held by the credential store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    /// Argon2 PHC string, never the cleartext password
    pub hashed_password: String,
    /// Set by the account-upgrade webhook
    pub is_chirpy_red: bool,
}

impl User {
    /// Create a new user record
    pub fn new(email: String, hashed_password: String) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new_v4(),
            created_at: now,
            updated_at: now,
            email,
            hashed_password,
            is_chirpy_red: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_parse_and_display() {
        let id = UserId::new_v4();
        let parsed: UserId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);

        assert!("not-a-uuid".parse::<UserId>().is_err());
    }

    #[test]
    fn test_new_user_defaults() {
        let user = User::new("walt@breakingbad.com".into(), "$argon2id$hash".into());
        assert!(!user.is_chirpy_red);
        assert_eq!(user.created_at, user.updated_at);
    }
}
