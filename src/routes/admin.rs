//! Operator routes
//!
//! - GET  /admin/metrics - HTML page with the hit count
//! - POST /admin/reset   - Drop all users and tokens, zero the counter (dev only)

use hyper::{Response, StatusCode};
use std::sync::Arc;
use tracing::{info, warn};

use super::response::{html_response, status_response, BoxBody};
use crate::server::AppState;
use crate::types::ChirpyError;

pub fn handle_metrics(state: &AppState) -> Response<BoxBody> {
    html_response(StatusCode::OK, metrics_page(state.hits()))
}

pub async fn handle_reset(state: Arc<AppState>) -> Result<Response<BoxBody>, ChirpyError> {
    if !state.args.is_dev() {
        warn!("Reset refused outside the dev platform");
        return Err(ChirpyError::Forbidden(
            "Reset is only allowed in dev environment".into(),
        ));
    }

    state.store.reset().await?;
    state.reset_hits();
    info!("Store and hit counter reset");

    Ok(status_response(StatusCode::OK))
}

fn metrics_page(hits: u64) -> String {
    format!(
        "<html><body><h1>Welcome, Chirpy Admin</h1><p>Chirpy has been visited {hits} times!</p></body></html>"
    )
}
