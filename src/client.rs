//! CipherOwl Client
//!
//! Authenticated access to the CipherOwl screening API.

use std::sync::Arc;
use tracing::debug;
use url::Url;

use crate::error::{ApiError, ConfigurationError, Error};
use crate::token::{ClientCredentialsProvider, TokenProvider};
use crate::types::CipherOwlConfig;

/// Sanction screening endpoint path.
pub const SANCTION_PATH: &str = "/api/v1/sanction";

/// Parameters for a sanction screening lookup.
#[derive(Clone, Debug)]
pub struct SanctionQuery {
    /// Project the lookup is billed against.
    pub project: String,
    /// Chain identifier, e.g. `bitcoin_mainnet`.
    pub chain: String,
    /// Address to screen.
    pub address: String,
}

/// CipherOwl API client.
///
/// Wraps a [`TokenProvider`] and attaches the bearer token to each request.
pub struct CipherOwlClient {
    http: reqwest::Client,
    api_base_url: Url,
    provider: Arc<dyn TokenProvider>,
}

impl CipherOwlClient {
    /// Create a client with the default client-credentials provider.
    pub fn new(config: CipherOwlConfig) -> Result<Self, Error> {
        let provider = Arc::new(ClientCredentialsProvider::new(config.clone())?);
        Self::with_provider(config, provider)
    }

    /// Create a client with an explicit token provider.
    pub fn with_provider(
        config: CipherOwlConfig,
        provider: Arc<dyn TokenProvider>,
    ) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Network {
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            api_base_url: config.api_base_url,
            provider,
        })
    }

    /// Issue an authenticated GET and return the JSON body.
    ///
    /// A non-success status is fatal for the invocation; the body is never
    /// returned in that case.
    pub async fn get_json(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<serde_json::Value, Error> {
        let url = self
            .api_base_url
            .join(path)
            .map_err(|_| ConfigurationError::InvalidEndpoint {
                url: format!("{}{}", self.api_base_url, path),
            })?;

        let token = self.provider.get_token().await?;

        let response = self
            .http
            .get(url)
            .query(query)
            .header(reqwest::header::AUTHORIZATION, token.authorization_header())
            .send()
            .await
            .map_err(|e| ApiError::Network {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        debug!(%status, path, "api request succeeded");
        response
            .json()
            .await
            .map_err(|e| {
                ApiError::MalformedResponse {
                    message: e.to_string(),
                }
                .into()
            })
    }

    /// Screen an address against the sanction lists.
    pub async fn check_sanction(&self, query: &SanctionQuery) -> Result<serde_json::Value, Error> {
        self.get_json(
            SANCTION_PATH,
            &[
                ("project", query.project.as_str()),
                ("chain", query.chain.as_str()),
                ("address", query.address.as_str()),
            ],
        )
        .await
    }
}
