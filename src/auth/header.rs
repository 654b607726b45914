//! `Authorization` header grammars
//!
//! Two schemes are understood, each exactly `"<Scheme> <token>"` with a single
//! space: `Bearer` for access and refresh tokens, `ApiKey` for the webhook
//! caller. There is no trimming and no case folding. Only the first
//! `Authorization` header is consulted.

use hyper::header::AUTHORIZATION;
use hyper::HeaderMap;

use crate::types::AuthError;

const BEARER_PREFIX: &str = "Bearer ";
const API_KEY_PREFIX: &str = "ApiKey ";

/// Extract the token from `Authorization: Bearer <token>`
pub fn get_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    extract_scheme(headers, BEARER_PREFIX)
}

/// Extract the key from `Authorization: ApiKey <key>`
pub fn get_api_key(headers: &HeaderMap) -> Result<&str, AuthError> {
    extract_scheme(headers, API_KEY_PREFIX)
}

fn extract_scheme<'a>(headers: &'a HeaderMap, prefix: &str) -> Result<&'a str, AuthError> {
    let value = headers.get(AUTHORIZATION).ok_or(AuthError::MissingHeader)?;
    let value = value.to_str().map_err(|_| AuthError::MalformedHeader)?;

    let credential = value.strip_prefix(prefix).ok_or(AuthError::MalformedHeader)?;
    if credential.is_empty() || credential.bytes().any(|b| b.is_ascii_whitespace()) {
        return Err(AuthError::MalformedHeader);
    }

    Ok(credential)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::HeaderValue;

    fn headers_with(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_get_api_key() {
        let headers = headers_with("ApiKey f271c819202a4667a425332c02094c97");
        assert_eq!(
            get_api_key(&headers),
            Ok("f271c819202a4667a425332c02094c97")
        );

        assert_eq!(get_api_key(&HeaderMap::new()), Err(AuthError::MissingHeader));
        assert_eq!(
            get_api_key(&headers_with("Bearer some-token")),
            Err(AuthError::MalformedHeader)
        );
        assert_eq!(get_api_key(&headers_with("ApiKey")), Err(AuthError::MalformedHeader));
        assert_eq!(get_api_key(&headers_with("ApiKey ")), Err(AuthError::MalformedHeader));
    }

    #[test]
    fn test_get_bearer_token() {
        assert_eq!(get_bearer_token(&headers_with("Bearer abc.def.ghi")), Ok("abc.def.ghi"));

        assert_eq!(get_bearer_token(&HeaderMap::new()), Err(AuthError::MissingHeader));
        assert_eq!(
            get_bearer_token(&headers_with("ApiKey abc")),
            Err(AuthError::MalformedHeader)
        );
        assert_eq!(get_bearer_token(&headers_with("Bearer")), Err(AuthError::MalformedHeader));
        // Raw tokens are not accepted
        assert_eq!(get_bearer_token(&headers_with("abc123")), Err(AuthError::MalformedHeader));
    }

    #[test]
    fn test_no_trimming_or_case_folding() {
        for value in [
            "bearer abc",
            "BEARER abc",
            "Bearer  abc",
            "Bearer abc ",
            "Bearer abc def",
            "Bearer\tabc",
            " Bearer abc",
        ] {
            assert_eq!(
                get_bearer_token(&headers_with(value)),
                Err(AuthError::MalformedHeader),
                "{value:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_non_visible_ascii_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer caf\xc3\xa9").unwrap(),
        );
        assert_eq!(get_bearer_token(&headers), Err(AuthError::MalformedHeader));
    }

    #[test]
    fn test_first_header_wins() {
        let mut headers = HeaderMap::new();
        headers.append(AUTHORIZATION, HeaderValue::from_static("Bearer first"));
        headers.append(AUTHORIZATION, HeaderValue::from_static("Bearer second"));
        assert_eq!(get_bearer_token(&headers), Ok("first"));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let headers = headers_with("Bearer token-1");
        assert_eq!(get_bearer_token(&headers), get_bearer_token(&headers));

        let headers = headers_with("ApiKey key-1");
        assert_eq!(get_api_key(&headers), get_api_key(&headers));
    }
}
