//! Response and body helpers shared by all routes

use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Body;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};

use crate::types::ChirpyError;

pub type BoxBody = http_body_util::combinators::BoxBody<Bytes, hyper::Error>;

/// Error type request bodies must convert into
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Largest request body accepted, in bytes
pub const MAX_BODY_BYTES: usize = 10 * 1024;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn full_body(data: impl Into<Bytes>) -> BoxBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed()
}

pub fn empty_body() -> BoxBody {
    Full::new(Bytes::new())
        .map_err(|never| match never {})
        .boxed()
}

fn with_content_type(status: StatusCode, body: BoxBody, content_type: &'static str) -> Response<BoxBody> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<BoxBody> {
    let json = serde_json::to_vec(body).unwrap_or_else(|_| b"{}".to_vec());
    with_content_type(status, full_body(json), "application/json")
}

pub fn text_response(status: StatusCode, text: &'static str) -> Response<BoxBody> {
    with_content_type(status, full_body(text), "text/plain; charset=utf-8")
}

pub fn html_response(status: StatusCode, html: String) -> Response<BoxBody> {
    with_content_type(status, full_body(html), "text/html; charset=utf-8")
}

/// Bodyless response, e.g. `204 No Content`
pub fn status_response(status: StatusCode) -> Response<BoxBody> {
    let mut response = Response::new(empty_body());
    *response.status_mut() = status;
    response
}

/// `{"error": ...}` with a client-safe message
pub fn error_response(err: &ChirpyError) -> Response<BoxBody> {
    json_response(
        err.status_code(),
        &ErrorResponse {
            error: err.client_message(),
        },
    )
}

/// Read and decode a JSON request body
///
/// At most [`MAX_BODY_BYTES`] are read; a longer body is rejected as soon as
/// the limit is crossed. Any decode failure becomes `BadRequest(invalid_message)`.
pub async fn parse_json_body<T, B>(req: Request<B>, invalid_message: &str) -> Result<T, ChirpyError>
where
    T: for<'de> Deserialize<'de>,
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let body = Limited::new(req.into_body(), MAX_BODY_BYTES)
        .collect()
        .await
        .map_err(|e| {
            if e.is::<LengthLimitError>() {
                ChirpyError::BadRequest("Request body too large".into())
            } else {
                ChirpyError::Http(format!("Failed to read body: {}", e))
            }
        })?;

    serde_json::from_slice(&body.to_bytes())
        .map_err(|_| ChirpyError::BadRequest(invalid_message.to_string()))
}
