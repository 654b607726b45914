//! HTTP routes for Chirpy

pub mod admin;
pub mod auth_routes;
pub mod health;
pub mod response;
pub mod users;
pub mod webhooks;

pub use response::{error_response, json_response, BoxBody, BoxError, ErrorResponse};

use bytes::Bytes;
use hyper::body::Body;
use hyper::{Method, Request, Response, StatusCode};
use std::sync::Arc;

use crate::server::AppState;
use crate::types::ChirpyError;

const KNOWN_PATHS: &[&str] = &[
    "/api/healthz",
    "/api/users",
    "/api/login",
    "/api/refresh",
    "/api/revoke",
    "/api/polka/webhooks",
    "/admin/metrics",
    "/admin/reset",
];

/// Dispatch a request on method and path
pub async fn route<B>(state: Arc<AppState>, req: Request<B>) -> Result<Response<BoxBody>, ChirpyError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    match (method, path.as_str()) {
        (Method::GET, "/api/healthz") => Ok(health::readiness()),

        (Method::POST, "/api/users") => users::handle_create_user(req, state).await,
        (Method::PUT, "/api/users") => users::handle_update_user(req, state).await,

        (Method::POST, "/api/login") => auth_routes::handle_login(req, state).await,
        (Method::POST, "/api/refresh") => auth_routes::handle_refresh(req, state).await,
        (Method::POST, "/api/revoke") => auth_routes::handle_revoke(req, state).await,

        (Method::POST, "/api/polka/webhooks") => webhooks::handle_polka_webhook(req, state).await,

        (Method::GET, "/admin/metrics") => Ok(admin::handle_metrics(&state)),
        (Method::POST, "/admin/reset") => admin::handle_reset(state).await,

        (_, p) if KNOWN_PATHS.contains(&p) => Ok(json_response(
            StatusCode::METHOD_NOT_ALLOWED,
            &ErrorResponse {
                error: "Method not allowed".into(),
            },
        )),

        _ => Err(ChirpyError::NotFound("Not found".into())),
    }
}
