//! Disk store for cached responses.
//!
//! Each entry is a pair of files keyed by the SHA-256 of the URL: a JSON
//! metadata file and the raw body. The store is trimmed to a configured
//! maximum size after every write, oldest entries first. All failures
//! degrade to cache-off behavior; nothing here is allowed to fail an
//! exchange.

use crate::cache::models::{CacheEntry, CacheStats};
use crate::error::{Error, Result};
use bytes::Bytes;
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Disk-backed response cache with a maximum total size.
#[derive(Debug, Clone)]
pub struct DiskCache {
    dir: PathBuf,
    max_size_bytes: u64,
    stats: Arc<RwLock<CacheStats>>,
}

impl DiskCache {
    /// Create a cache handle rooted at `dir`. The directory is created
    /// lazily on first store.
    pub fn new(dir: PathBuf, max_size_bytes: u64) -> Self {
        Self {
            dir,
            max_size_bytes,
            stats: Arc::new(RwLock::new(CacheStats::default())),
        }
    }

    /// SHA-256 cache key for a URL.
    fn key(url: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn meta_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn body_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.body"))
    }

    /// Look up the stored entry for a URL.
    ///
    /// Corrupt or half-written entries are removed and reported as a miss
    /// rather than surfaced as errors.
    pub async fn lookup(&self, url: &str) -> Option<(CacheEntry, Bytes)> {
        let key = Self::key(url);

        let meta = match tokio::fs::read(self.meta_path(&key)).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return None,
            Err(err) => {
                warn!("Failed to read cache metadata for {}: {}", url, err);
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_slice(&meta) {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Corrupt cache metadata for {}, discarding: {}", url, err);
                self.remove_entry(&key).await;
                return None;
            }
        };

        match tokio::fs::read(self.body_path(&key)).await {
            Ok(body) => Some((entry, Bytes::from(body))),
            Err(err) => {
                warn!("Missing cache body for {}, discarding: {}", url, err);
                self.remove_entry(&key).await;
                None
            }
        }
    }

    /// Persist an entry and its body, then trim the store to size.
    pub async fn store(&self, entry: &CacheEntry, body: &[u8]) -> Result<()> {
        let key = Self::key(&entry.url);

        tokio::fs::create_dir_all(&self.dir).await?;

        // Body first: metadata presence implies the body exists.
        tokio::fs::write(self.body_path(&key), body).await?;
        let meta = serde_json::to_vec(entry)?;
        tokio::fs::write(self.meta_path(&key), meta).await?;

        self.stats.write().await.stores += 1;
        debug!("Stored {} bytes for {}", body.len(), entry.url);

        self.trim().await;
        Ok(())
    }

    /// Refresh an entry's stored-at timestamp after a successful
    /// revalidation. Write failures are logged and ignored; the stale
    /// timestamp only costs an extra revalidation later.
    pub async fn touch(&self, entry: &mut CacheEntry) {
        entry.stored_at = SystemTime::now();
        let key = Self::key(&entry.url);

        let meta = match serde_json::to_vec(entry) {
            Ok(meta) => meta,
            Err(err) => {
                warn!("Failed to serialize cache metadata for {}: {}", entry.url, err);
                return;
            }
        };
        if let Err(err) = tokio::fs::write(self.meta_path(&key), meta).await {
            warn!("Failed to refresh cache entry for {}: {}", entry.url, err);
        }
    }

    /// Remove every entry in the store. A store that was never written
    /// to is an empty cache, not an error.
    pub async fn evict_all(&self) -> std::io::Result<()> {
        let mut dir = match tokio::fs::read_dir(&self.dir).await {
            Ok(dir) => dir,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(err),
        };

        let mut removed = 0u64;
        while let Some(file) = dir.next_entry().await? {
            tokio::fs::remove_file(file.path()).await?;
            removed += 1;
        }

        // Two files per entry.
        self.stats.write().await.evictions += removed / 2;
        debug!("Evicted all cache entries from {}", self.dir.display());
        Ok(())
    }

    /// Current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        self.stats.read().await.clone()
    }

    pub(crate) async fn mark_hit(&self) {
        self.stats.write().await.hits += 1;
    }

    pub(crate) async fn mark_miss(&self) {
        self.stats.write().await.misses += 1;
    }

    async fn remove_entry(&self, key: &str) {
        let _ = tokio::fs::remove_file(self.meta_path(key)).await;
        let _ = tokio::fs::remove_file(self.body_path(key)).await;
    }

    /// Delete oldest entries until the store fits the size limit.
    async fn trim(&self) {
        match self.scan().await {
            Ok((mut entries, mut total)) => {
                if total <= self.max_size_bytes {
                    return;
                }
                entries.sort_by_key(|e| e.stored_at);

                let mut evicted = 0u64;
                for scanned in entries {
                    if total <= self.max_size_bytes {
                        break;
                    }
                    self.remove_entry(&scanned.key).await;
                    total = total.saturating_sub(scanned.size);
                    evicted += 1;
                }
                if evicted > 0 {
                    self.stats.write().await.evictions += evicted;
                    debug!("Trimmed {} cache entries", evicted);
                }
            }
            Err(err) => warn!("Cache trim scan failed: {}", err),
        }
    }

    async fn scan(&self) -> Result<(Vec<ScannedEntry>, u64)> {
        let mut dir = tokio::fs::read_dir(&self.dir).await?;
        let mut entries = Vec::new();
        let mut total = 0u64;

        while let Some(file) = dir.next_entry().await? {
            let path = file.path();
            let size = file.metadata().await.map(|m| m.len()).unwrap_or(0);
            total += size;

            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let key = match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) => stem.to_string(),
                None => continue,
            };

            let meta = tokio::fs::read(&path).await?;
            let entry: CacheEntry = serde_json::from_slice(&meta)
                .map_err(|err| Error::Cache(format!("corrupt metadata {}: {}", key, err)))?;

            let body_size = tokio::fs::metadata(self.body_path(&key))
                .await
                .map(|m| m.len())
                .unwrap_or(0);

            entries.push(ScannedEntry {
                key,
                stored_at: entry.stored_at,
                size: size + body_size,
            });
        }

        Ok((entries, total))
    }
}

struct ScannedEntry {
    key: String,
    stored_at: SystemTime,
    size: u64,
}
