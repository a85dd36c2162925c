//! Error Types
//!
//! Error hierarchy for token acquisition, caching, and API access.

use std::time::Duration;
use thiserror::Error;

/// Root error type for the CipherOwl integration.
#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("token cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("authorization server error: {0}")]
    Server(#[from] ServerError),

    #[error("api error: {0}")]
    Api(#[from] ApiError),
}

impl Error {
    /// Get error code for telemetry.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CIPHEROWL_CONFIG",
            Self::Cache(_) => "CIPHEROWL_CACHE",
            Self::Server(_) => "CIPHEROWL_AUTH_SERVER",
            Self::Api(_) => "CIPHEROWL_API",
        }
    }
}

/// Configuration error. These abort before any network call is made.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("missing credential: {name} is not set")]
    MissingCredential { name: String },

    #[error("home directory could not be determined")]
    HomeDirUnavailable,

    #[error("invalid endpoint URL: {url}")]
    InvalidEndpoint { url: String },
}

/// Token cache error.
///
/// Read-side variants signal a cache miss and trigger a refresh; write-side
/// variants are logged and never abort the caller's flow.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("no cached token")]
    NotFound,

    #[error("cached token expired")]
    Expired,

    #[error("cache read failed: {message}")]
    ReadFailed { message: String },

    #[error("cache write failed: {message}")]
    WriteFailed { message: String },

    #[error("expiry claim unreadable: {message}")]
    ClaimParse { message: String },
}

/// Authorization server exchange error. Fatal for the current call.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("request failed: {message}")]
    Network { message: String },

    #[error("request timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("server returned status {status}")]
    Status { status: u16, body: String },

    #[error("malformed token response: {message}")]
    MalformedResponse { message: String },
}

/// Protected resource error. Fatal for the current invocation.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {message}")]
    Network { message: String },

    #[error("server returned status {status}")]
    Status { status: u16, body: String },

    #[error("malformed response body: {message}")]
    MalformedResponse { message: String },
}

/// Result type for CipherOwl operations.
pub type Result<T> = std::result::Result<T, Error>;
