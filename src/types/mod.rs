//! Type Definitions
//!
//! Configuration and token data structures.

pub mod config;
pub mod token;

pub use config::{
    CacheStrategy, CipherOwlConfig, Credentials, CLIENT_ID_VAR, CLIENT_SECRET_VAR,
    DEFAULT_AUDIENCE, DEFAULT_BASE_URL, DEFAULT_TIMEOUT,
};
pub use token::{AccessToken, CachedToken, TokenResponse};
