//! Token Lifecycle
//!
//! Expiry extraction, cache storage, and the provider that orchestrates the
//! credentials-grant exchange.

pub mod claims;
pub mod provider;
pub mod store;

pub use claims::token_expiry;
pub use provider::{ClientCredentialsProvider, MockTokenProvider, TokenProvider};
pub use store::{FileTokenStore, InMemoryTokenStore, MockTokenStore, TokenStore};
