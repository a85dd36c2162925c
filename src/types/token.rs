//! Token Types
//!
//! Token wire format, cache record, and the bearer credential handed to
//! callers.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::HashMap;

/// Token response from the authorization server.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
    /// Access token.
    pub access_token: String,
    /// Token type (usually "Bearer").
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Additional fields.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Cached token record.
///
/// Created on the first successful exchange and overwritten on each refresh;
/// expiry is the only invalidation mechanism.
#[derive(Clone, Debug)]
pub struct CachedToken {
    /// Access token.
    pub access_token: String,
    /// Expiry instant, taken from the token's own `exp` claim.
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Create a new cache record.
    pub fn new(access_token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at,
        }
    }

    /// A record is usable only while the current time is strictly before its
    /// expiry.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Bearer credential for API requests.
#[derive(Clone)]
pub struct AccessToken {
    /// Token value (secret).
    value: SecretString,
    /// Expiry instant, when known.
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Create a new access token.
    pub fn new(value: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            value: SecretString::new(value),
            expires_at,
        }
    }

    /// Get the raw token value.
    pub fn secret(&self) -> &str {
        self.value.expose_secret()
    }

    /// Format as Authorization header value.
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.value.expose_secret())
    }
}

impl From<&CachedToken> for AccessToken {
    fn from(record: &CachedToken) -> Self {
        Self::new(record.access_token.clone(), Some(record.expires_at))
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
