//! Authentication and session credentials
//!
//! - `password`: Argon2id hashing
//! - `jwt`: HS256 access tokens
//! - `refresh`: opaque refresh tokens and their stored state
//! - `header`: `Bearer` / `ApiKey` header grammars
//! - `api_key`: webhook key comparison
//! - `gate`: header to principal, with uniform failure masking
//! - `session`: login, refresh and revoke over a credential store

pub mod api_key;
pub mod gate;
pub mod header;
pub mod jwt;
pub mod password;
pub mod refresh;
pub mod session;

pub use api_key::ApiKeyValidator;
pub use gate::{AuthGate, Principal};
pub use header::{get_api_key, get_bearer_token};
pub use jwt::{issue_access_token, verify_access_token, Claims, TokenCodec, TOKEN_ISSUER};
pub use password::{hash_password, verify_password};
pub use refresh::{
    make_refresh_token, RefreshTokenRecord, RefreshTokenState, REFRESH_TOKEN_TTL_DAYS,
};
pub use session::{LoginGrant, SessionService};

use std::time::Duration;

/// Lifetime of an access token
pub const ACCESS_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);
