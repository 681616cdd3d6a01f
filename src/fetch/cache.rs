//! File-backed response cache with a fixed entry lifetime.

use crate::error::FetchError;
use bytes::Bytes;
use sha2::{Digest, Sha256};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_CACHE_DIR: &str = ".cache";
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Stores response bodies under `dir`, one file per key.
///
/// Entries older than `ttl` (by file modification time) are treated as
/// missing and overwritten on the next store.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Entry file for `key`, named by the SHA-256 of the key so names stay
    /// the same across builds.
    fn path_for(&self, key: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        self.dir.join(format!("{}.body", hex::encode(hasher.finalize())))
    }

    /// Returns the cached body for `key` if present and fresh.
    pub async fn get(&self, key: &str) -> Result<Option<Bytes>, FetchError> {
        let path = self.path_for(key);

        let metadata = match tokio::fs::metadata(&path).await {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(FetchError::Cache { path, source }),
        };

        // A modification time in the future counts as fresh.
        let age = metadata
            .modified()
            .map_err(|source| FetchError::Cache {
                path: path.clone(),
                source,
            })?
            .elapsed()
            .unwrap_or_default();

        if age > self.ttl {
            debug!(path = %path.display(), ?age, "Cache entry expired");
            return Ok(None);
        }

        let body = tokio::fs::read(&path)
            .await
            .map_err(|source| FetchError::Cache {
                path: path.clone(),
                source,
            })?;
        debug!(path = %path.display(), bytes = body.len(), "Cache hit");
        Ok(Some(Bytes::from(body)))
    }

    /// Stores `body` under `key`, creating the cache directory if needed.
    pub async fn put(&self, key: &str, body: &[u8]) -> Result<(), FetchError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| FetchError::Cache {
                path: self.dir.clone(),
                source,
            })?;

        let path = self.path_for(key);
        tokio::fs::write(&path, body)
            .await
            .map_err(|source| FetchError::Cache { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_miss_then_hit() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path().join("nested"), DEFAULT_CACHE_TTL);

        assert_eq!(cache.get("https://example.test/a").await.unwrap(), None);

        cache.put("https://example.test/a", b"payload").await.unwrap();
        let hit = cache.get("https://example.test/a").await.unwrap();
        assert_eq!(hit.as_deref(), Some(&b"payload"[..]));
        assert_eq!(cache.get("https://example.test/b").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_entry_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path(), Duration::ZERO);

        cache.put("key", b"old").await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(cache.get("key").await.unwrap(), None);
    }

    #[test]
    fn test_distinct_keys_get_distinct_files() {
        let cache = ResponseCache::new("/tmp/unused", DEFAULT_CACHE_TTL);
        assert_ne!(cache.path_for("a"), cache.path_for("b"));
        assert_eq!(cache.path_for("a"), cache.path_for("a"));
    }

    #[test]
    fn test_entry_name_is_sha256_of_key() {
        let cache = ResponseCache::new("/tmp/unused", DEFAULT_CACHE_TTL);
        assert_eq!(
            cache.path_for("abc"),
            Path::new("/tmp/unused")
                .join("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad.body")
        );
    }
}
