//! Readiness probe
//!
//! `GET /api/healthz` answers `200 OK` with a plain-text body whenever the
//! process is accepting requests. It touches no credentials and no store.

use hyper::{Response, StatusCode};

use super::response::{text_response, BoxBody};

pub fn readiness() -> Response<BoxBody> {
    text_response(StatusCode::OK, "OK")
}
