//! Webhook API key
//!
//! The payment provider authenticates with `Authorization: ApiKey <key>`
//! against one static key configured at startup.

use subtle::ConstantTimeEq;

/// Static shared secret for the webhook caller
#[derive(Clone)]
pub struct ApiKeyValidator {
    key: String,
}

impl ApiKeyValidator {
    /// Create a validator; an empty key accepts nothing
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Check if a key is configured
    pub fn is_configured(&self) -> bool {
        !self.key.is_empty()
    }

    /// Compare a presented key without leaking where it differs
    pub fn validate(&self, candidate: &str) -> bool {
        self.is_configured() && bool::from(candidate.as_bytes().ct_eq(self.key.as_bytes()))
    }
}

impl std::fmt::Debug for ApiKeyValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyValidator")
            .field("configured", &self.is_configured())
            .finish()
    }
}
