//! Token Storage
//!
//! Cache implementations behind the [`TokenStore`] trait: a single in-memory
//! slot, a durable on-disk record, and a mock for tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{CacheError, ConfigurationError};
use crate::token::claims;
use crate::types::CachedToken;

/// Directory under the user's home holding the token cache.
pub const TOKEN_CACHE_DIR: &str = ".cipherowl";

/// Token cache file name.
pub const TOKEN_CACHE_FILE: &str = "token-cache.json";

/// Token cache interface.
///
/// The store exclusively owns the cached record; callers go through `read`
/// and `write` and never touch the underlying slot or file directly.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Return the cached token only if present and unexpired.
    ///
    /// Never performs network access and never returns a stale token; any
    /// failure is reported as a [`CacheError`] and treated as a miss by
    /// callers.
    async fn read(&self) -> Result<CachedToken, CacheError>;

    /// Unconditionally overwrite the cached record.
    async fn write(&self, record: CachedToken) -> Result<(), CacheError>;
}

/// In-memory token store: one slot, valid for the process lifetime.
#[derive(Default)]
pub struct InMemoryTokenStore {
    slot: Mutex<Option<CachedToken>>,
}

impl InMemoryTokenStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn read(&self) -> Result<CachedToken, CacheError> {
        let slot = self.slot.lock().unwrap();
        match slot.as_ref() {
            None => Err(CacheError::NotFound),
            Some(record) if record.is_expired() => Err(CacheError::Expired),
            Some(record) => Ok(record.clone()),
        }
    }

    async fn write(&self, record: CachedToken) -> Result<(), CacheError> {
        *self.slot.lock().unwrap() = Some(record);
        Ok(())
    }
}

/// On-disk record format. Only the token itself is persisted; the expiry is
/// re-derived from the token's `exp` claim on read.
#[derive(Serialize, Deserialize)]
struct TokenCacheFile {
    access_token: String,
}

/// Durable token store backed by a JSON file.
///
/// The record survives process restarts. The well-known location is
/// `~/.cipherowl/token-cache.json`.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Create a store at the well-known location under the user's home.
    ///
    /// Fails when the home directory cannot be determined, before any
    /// network call is attempted.
    pub fn from_home() -> Result<Self, ConfigurationError> {
        let home = dirs::home_dir().ok_or(ConfigurationError::HomeDirUnavailable)?;
        Ok(Self::new(home.join(TOKEN_CACHE_DIR).join(TOKEN_CACHE_FILE)))
    }

    /// Create a store at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the cache file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn read(&self) -> Result<CachedToken, CacheError> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(CacheError::NotFound),
            Err(e) => {
                return Err(CacheError::ReadFailed {
                    message: e.to_string(),
                })
            }
        };

        let record: TokenCacheFile =
            serde_json::from_slice(&data).map_err(|e| CacheError::ReadFailed {
                message: e.to_string(),
            })?;

        let expires_at = claims::token_expiry(&record.access_token)?;
        let record = CachedToken::new(record.access_token, expires_at);
        if record.is_expired() {
            return Err(CacheError::Expired);
        }

        tracing::debug!(path = %self.path.display(), "read token from cache file");
        Ok(record)
    }

    async fn write(&self, record: CachedToken) -> Result<(), CacheError> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| CacheError::WriteFailed {
                    message: e.to_string(),
                })?;
        }

        let data = serde_json::to_vec(&TokenCacheFile {
            access_token: record.access_token,
        })
        .map_err(|e| CacheError::WriteFailed {
            message: e.to_string(),
        })?;

        tokio::fs::write(&self.path, data)
            .await
            .map_err(|e| CacheError::WriteFailed {
                message: e.to_string(),
            })?;

        tracing::debug!(path = %self.path.display(), "wrote token to cache file");
        Ok(())
    }
}

/// Mock token store for testing.
#[derive(Default)]
pub struct MockTokenStore {
    record: Mutex<Option<CachedToken>>,
    read_count: Mutex<usize>,
    write_history: Mutex<Vec<CachedToken>>,
    fail_writes: Mutex<bool>,
    fail_reads: Mutex<bool>,
}

impl MockTokenStore {
    /// Create an empty mock store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the cached record.
    pub fn with_record(self, record: CachedToken) -> Self {
        *self.record.lock().unwrap() = Some(record);
        self
    }

    /// Make subsequent writes fail.
    pub fn set_fail_writes(&self, fail: bool) -> &Self {
        *self.fail_writes.lock().unwrap() = fail;
        self
    }

    /// Make subsequent reads fail.
    pub fn set_fail_reads(&self, fail: bool) -> &Self {
        *self.fail_reads.lock().unwrap() = fail;
        self
    }

    /// Number of reads observed.
    pub fn read_count(&self) -> usize {
        *self.read_count.lock().unwrap()
    }

    /// Records passed to `write`.
    pub fn write_history(&self) -> Vec<CachedToken> {
        self.write_history.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenStore for MockTokenStore {
    async fn read(&self) -> Result<CachedToken, CacheError> {
        *self.read_count.lock().unwrap() += 1;

        if *self.fail_reads.lock().unwrap() {
            return Err(CacheError::ReadFailed {
                message: "mock read failure".to_string(),
            });
        }

        let record = self.record.lock().unwrap();
        match record.as_ref() {
            None => Err(CacheError::NotFound),
            Some(record) if record.is_expired() => Err(CacheError::Expired),
            Some(record) => Ok(record.clone()),
        }
    }

    async fn write(&self, record: CachedToken) -> Result<(), CacheError> {
        if *self.fail_writes.lock().unwrap() {
            return Err(CacheError::WriteFailed {
                message: "mock write failure".to_string(),
            });
        }

        self.write_history.lock().unwrap().push(record.clone());
        *self.record.lock().unwrap() = Some(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header};
    use serde::Serialize;

    #[derive(Serialize)]
    struct TestClaims {
        exp: i64,
    }

    fn encode_token(exp_offset_secs: i64) -> String {
        let claims = TestClaims {
            exp: Utc::now().timestamp() + exp_offset_secs,
        };
        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-signing-key"),
        )
        .unwrap()
    }

    fn live_record(token: &str) -> CachedToken {
        CachedToken::new(token, Utc::now() + Duration::seconds(3600))
    }

    #[tokio::test]
    async fn test_in_memory_read_after_write() {
        let store = InMemoryTokenStore::new();
        store.write(live_record("abc")).await.unwrap();

        let record = store.read().await.unwrap();
        assert_eq!(record.access_token, "abc");
    }

    #[tokio::test]
    async fn test_in_memory_empty_is_not_found() {
        let store = InMemoryTokenStore::new();
        assert!(matches!(store.read().await, Err(CacheError::NotFound)));
    }

    #[tokio::test]
    async fn test_in_memory_never_returns_expired_token() {
        let store = InMemoryTokenStore::new();
        store
            .write(CachedToken::new("abc", Utc::now() - Duration::seconds(1)))
            .await
            .unwrap();

        assert!(matches!(store.read().await, Err(CacheError::Expired)));
    }

    #[tokio::test]
    async fn test_in_memory_write_overwrites() {
        let store = InMemoryTokenStore::new();
        store.write(live_record("first")).await.unwrap();
        store.write(live_record("second")).await.unwrap();

        let record = store.read().await.unwrap();
        assert_eq!(record.access_token, "second");
    }

    #[tokio::test]
    async fn test_file_store_round_trip_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token-cache.json");
        let token = encode_token(3600);

        let store = FileTokenStore::new(&path);
        store.write(live_record(&token)).await.unwrap();

        // A fresh instance at the same path sees the record, as a restarted
        // process would.
        let reopened = FileTokenStore::new(&path);
        let record = reopened.read().await.unwrap();
        assert_eq!(record.access_token, token);
    }

    #[tokio::test]
    async fn test_file_store_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("absent.json"));
        assert!(matches!(store.read().await, Err(CacheError::NotFound)));
    }

    #[tokio::test]
    async fn test_file_store_expired_token_is_expired() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token-cache.json");
        let token = encode_token(-3600);

        let store = FileTokenStore::new(&path);
        store
            .write(CachedToken::new(&token, Utc::now() - Duration::seconds(3600)))
            .await
            .unwrap();

        assert!(matches!(store.read().await, Err(CacheError::Expired)));
    }

    #[tokio::test]
    async fn test_file_store_corrupt_file_is_read_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token-cache.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();

        let store = FileTokenStore::new(&path);
        assert!(matches!(
            store.read().await,
            Err(CacheError::ReadFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_file_store_opaque_token_is_claim_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token-cache.json");
        tokio::fs::write(&path, br#"{"access_token": "not-a-jwt"}"#)
            .await
            .unwrap();

        let store = FileTokenStore::new(&path);
        assert!(matches!(
            store.read().await,
            Err(CacheError::ClaimParse { .. })
        ));
    }

    #[tokio::test]
    async fn test_file_store_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TOKEN_CACHE_DIR).join(TOKEN_CACHE_FILE);
        let token = encode_token(3600);

        let store = FileTokenStore::new(&path);
        store.write(live_record(&token)).await.unwrap();

        assert!(store.path().exists());
    }

    #[tokio::test]
    async fn test_mock_store_write_failure_keeps_no_record() {
        let store = MockTokenStore::new();
        store.set_fail_writes(true);

        assert!(store.write(live_record("abc")).await.is_err());
        assert!(store.write_history().is_empty());
        assert!(matches!(store.read().await, Err(CacheError::NotFound)));
    }
}
