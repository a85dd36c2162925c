//! Configuration Builder
//!
//! Fluent builder for [`CipherOwlConfig`].

use std::time::Duration;
use url::Url;

use crate::error::ConfigurationError;
use crate::types::{
    CacheStrategy, CipherOwlConfig, Credentials, DEFAULT_AUDIENCE, DEFAULT_BASE_URL,
    DEFAULT_TIMEOUT,
};

/// CipherOwl configuration builder.
#[derive(Default)]
pub struct CipherOwlConfigBuilder {
    auth_base_url: Option<String>,
    api_base_url: Option<String>,
    audience: Option<String>,
    credentials: Option<Credentials>,
    timeout: Option<Duration>,
    cache: CacheStrategy,
}

impl CipherOwlConfigBuilder {
    /// Create a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the authorization server base URL.
    pub fn auth_base_url(mut self, url: impl Into<String>) -> Self {
        self.auth_base_url = Some(url.into());
        self
    }

    /// Set the API base URL.
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Set both base URLs at once.
    pub fn base_url(self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.auth_base_url(url.clone()).api_base_url(url)
    }

    /// Set the token audience.
    pub fn audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Set the client credentials.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set client ID and secret from raw values.
    pub fn client(self, client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        self.credentials(Credentials::new(client_id, client_secret))
    }

    /// Set the HTTP request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the token cache strategy.
    pub fn cache(mut self, cache: CacheStrategy) -> Self {
        self.cache = cache;
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<CipherOwlConfig, ConfigurationError> {
        let credentials = self
            .credentials
            .ok_or_else(|| ConfigurationError::MissingCredential {
                name: "client credentials".to_string(),
            })?;

        let auth_base_url = parse_base_url(
            self.auth_base_url
                .as_deref()
                .unwrap_or(DEFAULT_BASE_URL),
        )?;
        let api_base_url = parse_base_url(
            self.api_base_url.as_deref().unwrap_or(DEFAULT_BASE_URL),
        )?;

        Ok(CipherOwlConfig {
            auth_base_url,
            api_base_url,
            audience: self.audience.unwrap_or_else(|| DEFAULT_AUDIENCE.to_string()),
            credentials,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            cache: self.cache,
        })
    }
}

fn parse_base_url(url: &str) -> Result<Url, ConfigurationError> {
    let parsed = Url::parse(url).map_err(|_| ConfigurationError::InvalidEndpoint {
        url: url.to_string(),
    })?;
    if parsed.cannot_be_a_base() {
        return Err(ConfigurationError::InvalidEndpoint {
            url: url.to_string(),
        });
    }
    Ok(parsed)
}

/// Create a new configuration builder.
pub fn cipherowl_config() -> CipherOwlConfigBuilder {
    CipherOwlConfigBuilder::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_with_defaults() {
        let config = cipherowl_config()
            .client("test-id", "test-secret")
            .build()
            .unwrap();

        assert_eq!(config.auth_base_url.as_str(), "https://svc.cipherowl.ai/");
        assert_eq!(config.audience, DEFAULT_AUDIENCE);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.cache, CacheStrategy::InMemory);
    }

    #[test]
    fn test_build_requires_credentials() {
        let result = cipherowl_config().build();
        assert!(matches!(
            result,
            Err(ConfigurationError::MissingCredential { .. })
        ));
    }

    #[test]
    fn test_build_rejects_invalid_url() {
        let result = cipherowl_config()
            .client("id", "secret")
            .base_url("not a url")
            .build();
        assert!(matches!(
            result,
            Err(ConfigurationError::InvalidEndpoint { .. })
        ));
    }

    #[test]
    fn test_base_url_sets_both() {
        let config = cipherowl_config()
            .client("id", "secret")
            .base_url("http://localhost:8080")
            .cache(CacheStrategy::Durable)
            .build()
            .unwrap();

        assert_eq!(config.auth_base_url, config.api_base_url);
        assert_eq!(config.cache, CacheStrategy::Durable);
    }
}
