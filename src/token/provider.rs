//! Token Provider
//!
//! Obtains bearer tokens via the client-credentials grant, consulting the
//! token store first and refreshing from the authorization server on a miss.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

use crate::error::{Error, ServerError};
use crate::token::claims;
use crate::token::store::{FileTokenStore, InMemoryTokenStore, TokenStore};
use crate::types::{AccessToken, CachedToken, CacheStrategy, CipherOwlConfig, TokenResponse};

const GRANT_TYPE: &str = "client_credentials";

/// Token provider interface.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Return a bearer token valid at the time of the call.
    async fn get_token(&self) -> Result<AccessToken, Error>;
}

/// Exchange request body sent to the token endpoint.
#[derive(Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    audience: &'a str,
    grant_type: &'a str,
}

/// Client-credentials token provider with caching.
///
/// Each `get_token` call checks the store and returns immediately on a hit.
/// On a miss it performs exactly one exchange against the authorization
/// server; there are no retries. A failure to cache the fresh token is
/// logged and does not fail the call.
pub struct ClientCredentialsProvider {
    config: CipherOwlConfig,
    token_endpoint: Url,
    http: reqwest::Client,
    store: Arc<dyn TokenStore>,
    // Serializes check-then-refresh so concurrent callers cannot race a
    // double exchange.
    refresh_lock: tokio::sync::Mutex<()>,
}

impl ClientCredentialsProvider {
    /// Create a provider with the store selected by the configured cache
    /// strategy.
    pub fn new(config: CipherOwlConfig) -> Result<Self, Error> {
        let store: Arc<dyn TokenStore> = match config.cache {
            CacheStrategy::InMemory => Arc::new(InMemoryTokenStore::new()),
            CacheStrategy::Durable => Arc::new(FileTokenStore::from_home()?),
        };
        Self::with_store(config, store)
    }

    /// Create a provider with an explicit store.
    pub fn with_store(config: CipherOwlConfig, store: Arc<dyn TokenStore>) -> Result<Self, Error> {
        let token_endpoint = config.token_endpoint()?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ServerError::Network {
                message: e.to_string(),
            })?;

        Ok(Self {
            config,
            token_endpoint,
            http,
            store,
            refresh_lock: tokio::sync::Mutex::new(()),
        })
    }

    /// Single exchange attempt against the token endpoint.
    async fn request_token(&self) -> Result<TokenResponse, ServerError> {
        let request = TokenRequest {
            client_id: &self.config.credentials.client_id,
            client_secret: self.config.credentials.client_secret.expose_secret(),
            audience: &self.config.audience,
            grant_type: GRANT_TYPE,
        };

        let response = self
            .http
            .post(self.token_endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ServerError::Timeout {
                        timeout: self.config.timeout,
                    }
                } else {
                    ServerError::Network {
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServerError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| ServerError::MalformedResponse {
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl TokenProvider for ClientCredentialsProvider {
    async fn get_token(&self) -> Result<AccessToken, Error> {
        let _guard = self.refresh_lock.lock().await;

        match self.store.read().await {
            Ok(record) => {
                debug!("get token from cache");
                return Ok(AccessToken::from(&record));
            }
            Err(reason) => debug!(%reason, "token cache miss"),
        }

        let response = self.request_token().await.map_err(Error::Server)?;
        debug!("get token from server");

        let expires_at = match claims::token_expiry(&response.access_token) {
            Ok(expires_at) => {
                let record = CachedToken::new(response.access_token.clone(), expires_at);
                if let Err(error) = self.store.write(record).await {
                    warn!(%error, "failed to cache token");
                }
                Some(expires_at)
            }
            Err(error) => {
                warn!(%error, "could not read expiry claim, token not cached");
                None
            }
        };

        Ok(AccessToken::new(response.access_token, expires_at))
    }
}

/// Mock token provider for testing.
#[derive(Default)]
pub struct MockTokenProvider {
    token: std::sync::Mutex<Option<String>>,
    call_count: std::sync::Mutex<usize>,
    next_error: std::sync::Mutex<Option<Error>>,
}

impl MockTokenProvider {
    /// Create a mock returning a fixed token.
    pub fn with_token(token: impl Into<String>) -> Self {
        let mock = Self::default();
        *mock.token.lock().unwrap() = Some(token.into());
        mock
    }

    /// Set the next call to fail.
    pub fn set_next_error(&self, error: Error) -> &Self {
        *self.next_error.lock().unwrap() = Some(error);
        self
    }

    /// Number of `get_token` calls observed.
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl TokenProvider for MockTokenProvider {
    async fn get_token(&self) -> Result<AccessToken, Error> {
        *self.call_count.lock().unwrap() += 1;

        if let Some(error) = self.next_error.lock().unwrap().take() {
            return Err(error);
        }

        let token = self
            .token
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| "mock-access-token".to_string());
        Ok(AccessToken::new(token, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;
    use crate::token::store::MockTokenStore;
    use crate::types::{Credentials, DEFAULT_AUDIENCE, DEFAULT_TIMEOUT};
    use chrono::{Duration, Utc};

    fn test_config(base_url: &str) -> CipherOwlConfig {
        CipherOwlConfig {
            auth_base_url: Url::parse(base_url).unwrap(),
            api_base_url: Url::parse(base_url).unwrap(),
            audience: DEFAULT_AUDIENCE.to_string(),
            credentials: Credentials::new("test-client", "test-secret"),
            timeout: DEFAULT_TIMEOUT,
            cache: CacheStrategy::InMemory,
        }
    }

    #[tokio::test]
    async fn test_cache_hit_returns_without_network() {
        // The endpoint is unroutable; a hit must never touch it.
        let store = MockTokenStore::new().with_record(CachedToken::new(
            "abc",
            Utc::now() + Duration::seconds(3600),
        ));
        let provider = ClientCredentialsProvider::with_store(
            test_config("http://127.0.0.1:1"),
            Arc::new(store),
        )
        .unwrap();

        let token = provider.get_token().await.unwrap();
        assert_eq!(token.secret(), "abc");
    }

    #[tokio::test]
    async fn test_exchange_failure_is_server_error() {
        let provider = ClientCredentialsProvider::with_store(
            test_config("http://127.0.0.1:1"),
            Arc::new(MockTokenStore::new()),
        )
        .unwrap();

        let result = provider.get_token().await;
        assert!(matches!(result, Err(Error::Server(_))));
    }

    #[tokio::test]
    async fn test_mock_provider_records_calls() {
        let provider = MockTokenProvider::with_token("abc");
        provider.get_token().await.unwrap();
        provider.get_token().await.unwrap();
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_provider_error_injection() {
        let provider = MockTokenProvider::default();
        provider.set_next_error(Error::Cache(CacheError::NotFound));

        assert!(provider.get_token().await.is_err());
        assert!(provider.get_token().await.is_ok());
    }
}
