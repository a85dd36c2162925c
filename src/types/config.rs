//! Configuration Types
//!
//! Client configuration for the CipherOwl API and its authorization server.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use url::Url;

use crate::error::ConfigurationError;

/// Base URL for both the CipherOwl API and its authorization server.
pub const DEFAULT_BASE_URL: &str = "https://svc.cipherowl.ai";

/// Audience the issued tokens are scoped to.
pub const DEFAULT_AUDIENCE: &str = "svc.cipherowl.ai";

/// Default HTTP request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client ID environment variable.
pub const CLIENT_ID_VAR: &str = "CLIENT_ID";

/// Client secret environment variable.
pub const CLIENT_SECRET_VAR: &str = "CLIENT_SECRET";

/// Token endpoint path on the authorization server.
pub(crate) const TOKEN_ENDPOINT_PATH: &str = "/oauth/token";

/// Client credentials for the authorization server.
///
/// Static configuration, never mutated at runtime.
#[derive(Clone)]
pub struct Credentials {
    /// Client identifier.
    pub client_id: String,
    /// Client secret.
    pub client_secret: SecretString,
}

impl Credentials {
    /// Create credentials from raw values.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::new(client_secret.into()),
        }
    }

    /// Read credentials from `CLIENT_ID` and `CLIENT_SECRET`.
    ///
    /// Fails with a clear diagnostic when either variable is unset, so a
    /// misconfigured process never reaches the network.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        let client_id = env::var(CLIENT_ID_VAR).map_err(|_| {
            ConfigurationError::MissingCredential {
                name: CLIENT_ID_VAR.to_string(),
            }
        })?;
        let client_secret = env::var(CLIENT_SECRET_VAR).map_err(|_| {
            ConfigurationError::MissingCredential {
                name: CLIENT_SECRET_VAR.to_string(),
            }
        })?;

        Ok(Self::new(client_id, client_secret))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Token cache placement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheStrategy {
    /// Single in-process slot, valid for one process lifetime.
    #[default]
    InMemory,
    /// On-disk record under the user's home directory, valid across restarts.
    Durable,
}

/// CipherOwl client configuration.
#[derive(Clone, Debug)]
pub struct CipherOwlConfig {
    /// Authorization server base URL.
    pub auth_base_url: Url,
    /// API base URL.
    pub api_base_url: Url,
    /// Audience for issued tokens.
    pub audience: String,
    /// Client credentials.
    pub credentials: Credentials,
    /// HTTP request timeout.
    pub timeout: Duration,
    /// Token cache placement.
    pub cache: CacheStrategy,
}

impl CipherOwlConfig {
    /// Full URL of the token endpoint.
    pub fn token_endpoint(&self) -> Result<Url, ConfigurationError> {
        self.auth_base_url.join(TOKEN_ENDPOINT_PATH).map_err(|_| {
            ConfigurationError::InvalidEndpoint {
                url: self.auth_base_url.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let credentials = Credentials::new("client-id", "very-secret");
        let rendered = format!("{:?}", credentials);
        assert!(rendered.contains("client-id"));
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("very-secret"));
    }

    #[test]
    fn test_token_endpoint_join() {
        let config = CipherOwlConfig {
            auth_base_url: Url::parse(DEFAULT_BASE_URL).unwrap(),
            api_base_url: Url::parse(DEFAULT_BASE_URL).unwrap(),
            audience: DEFAULT_AUDIENCE.to_string(),
            credentials: Credentials::new("id", "secret"),
            timeout: DEFAULT_TIMEOUT,
            cache: CacheStrategy::InMemory,
        };

        let endpoint = config.token_endpoint().unwrap();
        assert_eq!(endpoint.as_str(), "https://svc.cipherowl.ai/oauth/token");
    }

    #[test]
    fn test_cache_strategy_default() {
        assert_eq!(CacheStrategy::default(), CacheStrategy::InMemory);
    }
}
