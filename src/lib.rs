//! CipherOwl Integration Module
//!
//! Client for the CipherOwl screening API with OAuth2 client-credentials
//! authentication and token caching.
//!
//! Tokens are obtained from the authorization server with a single
//! credentials-grant exchange and cached, either in process memory or in a
//! durable file under the user's home directory, until the expiry instant
//! carried in the token's own `exp` claim. A valid cached token
//! short-circuits the exchange entirely.
//!
//! # Example
//!
//! ```rust,ignore
//! use cipherowl_integration::{cipherowl_config, CacheStrategy, CipherOwlClient, SanctionQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = cipherowl_config()
//!         .client("my-client-id", "my-client-secret")
//!         .cache(CacheStrategy::Durable)
//!         .build()?;
//!
//!     let client = CipherOwlClient::new(config)?;
//!     let report = client
//!         .check_sanction(&SanctionQuery {
//!             project: "partner".to_string(),
//!             chain: "bitcoin_mainnet".to_string(),
//!             address: "12udabs2TkX7NXCSj6KpqXfakjE52ZPLhz".to_string(),
//!         })
//!         .await?;
//!
//!     println!("{report:#}");
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `types`: configuration and token data structures
//! - `error`: error hierarchy
//! - `token`: claims decoding, cache stores, and the token provider
//! - `builders`: fluent configuration builder
//! - `client`: high-level API client

pub mod builders;
pub mod client;
pub mod error;
pub mod token;
pub mod types;

// Re-export main client
pub use client::{CipherOwlClient, SanctionQuery, SANCTION_PATH};

// Re-export builders
pub use builders::{cipherowl_config, CipherOwlConfigBuilder};

// Re-export errors
pub use error::{ApiError, CacheError, ConfigurationError, Error, Result, ServerError};

// Re-export types
pub use types::{
    AccessToken, CachedToken, CacheStrategy, CipherOwlConfig, Credentials, TokenResponse,
    CLIENT_ID_VAR, CLIENT_SECRET_VAR, DEFAULT_AUDIENCE, DEFAULT_BASE_URL, DEFAULT_TIMEOUT,
};

// Re-export token management
pub use token::{
    token_expiry, ClientCredentialsProvider, FileTokenStore, InMemoryTokenStore, MockTokenProvider,
    MockTokenStore, TokenProvider, TokenStore,
};
