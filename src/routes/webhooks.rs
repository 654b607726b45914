//! Payment provider webhook
//!
//! POST /api/polka/webhooks, authenticated with `Authorization: ApiKey`.
//! Only `user.upgraded` does anything; every other event is acknowledged
//! with 204 so the provider stops retrying.

use bytes::Bytes;
use hyper::body::Body;
use hyper::{Request, Response, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

use super::response::{parse_json_body, status_response, BoxBody, BoxError};
use crate::server::AppState;
use crate::types::{ChirpyError, UserId};

pub const USER_UPGRADED_EVENT: &str = "user.upgraded";

#[derive(Debug, Default, Deserialize)]
pub struct WebhookRequest {
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub data: WebhookData,
}

#[derive(Debug, Default, Deserialize)]
pub struct WebhookData {
    #[serde(default)]
    pub user_id: String,
}

pub async fn handle_polka_webhook<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<BoxBody>, ChirpyError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    state.gate.authenticate_api_key(req.headers())?;

    let body: WebhookRequest = parse_json_body(req, "Couldn't decode parameters").await?;
    if body.event != USER_UPGRADED_EVENT {
        debug!(event = %body.event, "Ignoring webhook event");
        return Ok(status_response(StatusCode::NO_CONTENT));
    }

    let user_id: UserId = body
        .data
        .user_id
        .parse()
        .map_err(|_| ChirpyError::BadRequest("Invalid user ID".into()))?;

    state.store.upgrade_user(user_id).await?;

    info!(user_id = %user_id, "User upgraded to Chirpy Red");
    Ok(status_response(StatusCode::NO_CONTENT))
}
