//! User account routes
//!
//! - POST /api/users - Create an account
//! - PUT  /api/users - Change own email and password (bearer access token)

use bytes::Bytes;
use chrono::{DateTime, Utc};
use hyper::body::Body;
use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use super::response::{json_response, parse_json_body, BoxBody, BoxError};
use crate::auth::hash_password;
use crate::server::AppState;
use crate::types::{ChirpyError, User, UserId};

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Public view of a user; tokens are only present on login
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub is_chirpy_red: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            created_at: user.created_at,
            updated_at: user.updated_at,
            email: user.email,
            token: None,
            refresh_token: None,
            is_chirpy_red: user.is_chirpy_red,
        }
    }
}

fn validate_email(email: &str) -> Result<(), ChirpyError> {
    if email.trim().is_empty() {
        return Err(ChirpyError::BadRequest("Email is required".into()));
    }
    Ok(())
}

pub async fn handle_create_user<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<BoxBody>, ChirpyError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let body: CredentialsRequest = parse_json_body(req, "Invalid JSON").await?;
    validate_email(&body.email)?;

    let hashed = hash_password(&body.password)?;
    let user = state.store.create_user(&body.email, &hashed).await?;

    info!(user_id = %user.id, "User registered");
    Ok(json_response(StatusCode::CREATED, &UserResponse::from(user)))
}

pub async fn handle_update_user<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<BoxBody>, ChirpyError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let user_id = state.gate.authenticate_bearer(req.headers())?.user_id()?;
    let body: CredentialsRequest = parse_json_body(req, "Invalid JSON").await?;
    validate_email(&body.email)?;

    let hashed = hash_password(&body.password)?;
    let user = state.store.update_user(user_id, &body.email, &hashed).await?;

    info!(user_id = %user.id, "User updated credentials");
    Ok(json_response(StatusCode::OK, &UserResponse::from(user)))
}
