//! HTTP routes for sessions
//!
//! - POST /api/login   - Check email/password, issue access + refresh token
//! - POST /api/refresh - Exchange a refresh token for a new access token
//! - POST /api/revoke  - Revoke a refresh token
//!
//! Refresh and revoke carry the refresh token as `Authorization: Bearer`.

use bytes::Bytes;
use hyper::body::Body;
use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use super::response::{json_response, parse_json_body, status_response, BoxBody, BoxError};
use super::users::{CredentialsRequest, UserResponse};
use crate::auth::get_bearer_token;
use crate::server::AppState;
use crate::types::ChirpyError;

/// Message for a refresh/revoke request without a usable bearer header
pub const MISSING_TOKEN_MESSAGE: &str = "Missing token";

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub token: String,
}

/// Pull the refresh token out of the bearer header
///
/// Unlike the access-token gate, a bad header here is the client's request
/// shape being wrong, so it is a 400.
fn refresh_token_from<B>(req: &Request<B>) -> Result<String, ChirpyError> {
    get_bearer_token(req.headers())
        .map(str::to_string)
        .map_err(|e| {
            debug!(reason = %e, "Refresh token header rejected");
            ChirpyError::BadRequest(MISSING_TOKEN_MESSAGE.into())
        })
}

pub async fn handle_login<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<BoxBody>, ChirpyError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let body: CredentialsRequest = parse_json_body(req, "Invalid JSON").await?;
    let grant = state.sessions.login(&body.email, &body.password).await?;

    let mut response = UserResponse::from(grant.user);
    response.token = Some(grant.access_token);
    response.refresh_token = Some(grant.refresh_token);

    Ok(json_response(StatusCode::OK, &response))
}

pub async fn handle_refresh<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<BoxBody>, ChirpyError> {
    let refresh_token = refresh_token_from(&req)?;
    let token = state.sessions.refresh(&refresh_token).await?;

    Ok(json_response(StatusCode::OK, &RefreshResponse { token }))
}

pub async fn handle_revoke<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<BoxBody>, ChirpyError> {
    let refresh_token = refresh_token_from(&req)?;
    state.sessions.revoke(&refresh_token).await?;

    Ok(status_response(StatusCode::NO_CONTENT))
}
