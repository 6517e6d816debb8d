//! File-backed cache store
//!
//! One file per entry under the cache directory, named by the hex form of
//! the key. Each file carries a 32-byte Blake3 checksum of the payload in
//! front of the payload itself, so a truncated or tampered entry is
//! detected on read and treated as a miss instead of poisoning a build.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use kiln_asset::ContentHash;
use tokio::fs;
use tracing::{debug, warn};

use crate::error::CacheError;
use crate::store::{AssetCache, CacheStats};

const CHECKSUM_LEN: usize = 32;

/// Persistent cache backed by a directory of checksummed entry files
///
/// Survives between process runs; entries live until [`clear_all`].
/// Hit/miss counters cover the current process only.
///
/// [`clear_all`]: AssetCache::clear_all
#[derive(Debug)]
pub struct DiskCache {
    cache_dir: PathBuf,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl DiskCache {
    /// Create a handle rooted at `cache_dir`
    ///
    /// The directory is not touched until [`init`](Self::init) or the
    /// first write.
    #[must_use]
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Ensure the cache directory exists
    ///
    /// # Errors
    /// Returns error if the directory cannot be created.
    pub async fn init(&self) -> Result<(), CacheError> {
        fs::create_dir_all(&self.cache_dir)
            .await
            .map_err(|e| CacheError::io_error(&self.cache_dir, e))?;
        debug!(cache_dir = %self.cache_dir.display(), "cache directory ready");
        Ok(())
    }

    /// Directory this cache stores entries under
    #[inline]
    #[must_use]
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn entry_path(&self, key: &ContentHash) -> PathBuf {
        self.cache_dir.join(key.to_string())
    }

    fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }
}

fn frame(payload: &[u8]) -> Vec<u8> {
    let checksum = ContentHash::compute(payload);
    let mut framed = Vec::with_capacity(CHECKSUM_LEN + payload.len());
    framed.extend_from_slice(checksum.as_bytes());
    framed.extend_from_slice(payload);
    framed
}

fn unframe(framed: &[u8]) -> Option<Vec<u8>> {
    if framed.len() < CHECKSUM_LEN {
        return None;
    }
    let (header, payload) = framed.split_at(CHECKSUM_LEN);
    let expected = ContentHash::from_slice(header).ok()?;
    if ContentHash::compute(payload) != expected {
        return None;
    }
    Some(payload.to_vec())
}

#[async_trait]
impl AssetCache for DiskCache {
    async fn get(&self, key: &ContentHash) -> Result<Option<Vec<u8>>, CacheError> {
        let path = self.entry_path(key);
        let framed = match fs::read(&path).await {
            Ok(framed) => framed,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.record_miss();
                debug!(key = %key.short(), "cache miss");
                return Ok(None);
            }
            Err(e) => return Err(CacheError::io_error(path, e)),
        };

        match unframe(&framed) {
            Some(payload) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key.short(), bytes = payload.len(), "cache hit");
                Ok(Some(payload))
            }
            None => {
                warn!(key = %key.short(), "cache entry failed checksum, discarding");
                if let Err(e) = fs::remove_file(&path).await {
                    if e.kind() != ErrorKind::NotFound {
                        warn!(key = %key.short(), error = %e, "could not remove corrupt entry");
                    }
                }
                self.record_miss();
                Ok(None)
            }
        }
    }

    async fn put(&self, key: &ContentHash, bytes: &[u8]) -> Result<(), CacheError> {
        let path = self.entry_path(key);
        fs::write(&path, frame(bytes))
            .await
            .map_err(|e| CacheError::io_error(&path, e))?;
        debug!(key = %key.short(), bytes = bytes.len(), "cached entry");
        Ok(())
    }

    async fn contains(&self, key: &ContentHash) -> Result<bool, CacheError> {
        let path = self.entry_path(key);
        fs::try_exists(&path)
            .await
            .map_err(|e| CacheError::io_error(path, e))
    }

    async fn clear_all(&self) -> Result<u64, CacheError> {
        let mut dir = match fs::read_dir(&self.cache_dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(CacheError::io_error(&self.cache_dir, e)),
        };

        let mut removed = 0u64;
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| CacheError::io_error(&self.cache_dir, e))?
        {
            let path = entry.path();
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| CacheError::io_error(&path, e))?;
            if !file_type.is_file() {
                continue;
            }
            fs::remove_file(&path)
                .await
                .map_err(|e| CacheError::io_error(&path, e))?;
            removed += 1;
        }

        debug!(removed, "cache cleared");
        Ok(removed)
    }

    async fn stats(&self) -> Result<CacheStats, CacheError> {
        let mut entry_count = 0u64;
        let mut total_bytes = 0u64;

        match fs::read_dir(&self.cache_dir).await {
            Ok(mut dir) => {
                while let Some(entry) = dir
                    .next_entry()
                    .await
                    .map_err(|e| CacheError::io_error(&self.cache_dir, e))?
                {
                    let path = entry.path();
                    let meta = entry
                        .metadata()
                        .await
                        .map_err(|e| CacheError::io_error(&path, e))?;
                    if meta.is_file() {
                        entry_count += 1;
                        total_bytes += meta.len();
                    }
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(CacheError::io_error(&self.cache_dir, e)),
        }

        Ok(CacheStats {
            entry_count,
            total_bytes,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn open_cache(dir: &Path) -> DiskCache {
        let cache = DiskCache::new(dir);
        cache.init().await.unwrap();
        cache
    }

    #[tokio::test]
    async fn disk_cache_put_and_get() {
        let dir = tempfile::tempdir().unwrap();
        let cache = open_cache(dir.path()).await;
        let key = ContentHash::compute(b"input identity");

        cache.put(&key, b"optimized bytes").await.unwrap();

        let got = cache.get(&key).await.unwrap();
        assert_eq!(got.as_deref(), Some(b"optimized bytes".as_slice()));
        assert!(cache.contains(&key).await.unwrap());
    }

    #[tokio::test]
    async fn disk_cache_miss_for_absent_key() {
        let dir = tempfile::tempdir().unwrap();
        let cache = open_cache(dir.path()).await;
        let key = ContentHash::compute(b"never stored");

        assert!(cache.get(&key).await.unwrap().is_none());
        assert!(!cache.contains(&key).await.unwrap());
    }

    #[tokio::test]
    async fn disk_cache_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let key = ContentHash::compute(b"persist me");

        {
            let cache = open_cache(dir.path()).await;
            cache.put(&key, b"across runs").await.unwrap();
        }

        let reopened = open_cache(dir.path()).await;
        let got = reopened.get(&key).await.unwrap();
        assert_eq!(got.as_deref(), Some(b"across runs".as_slice()));
    }

    #[tokio::test]
    async fn disk_cache_clear_all_removes_entries() {
        let dir = tempfile::tempdir().unwrap();
        let cache = open_cache(dir.path()).await;

        for i in 0..3u8 {
            let key = ContentHash::compute(&[i]);
            cache.put(&key, &[i; 4]).await.unwrap();
        }

        let removed = cache.clear_all().await.unwrap();
        assert_eq!(removed, 3);

        let key = ContentHash::compute(&[0u8]);
        assert!(cache.get(&key).await.unwrap().is_none());
        assert_eq!(cache.stats().await.unwrap().entry_count, 0);
    }

    #[tokio::test]
    async fn disk_cache_clear_all_without_dir_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskCache::new(dir.path().join("never-created"));
        assert_eq!(cache.clear_all().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn disk_cache_discards_corrupt_entry() {
        let dir = tempfile::tempdir().unwrap();
        let cache = open_cache(dir.path()).await;
        let key = ContentHash::compute(b"will corrupt");

        cache.put(&key, b"good payload").await.unwrap();

        // Truncate the entry file behind the cache's back
        let entry = dir.path().join(key.to_string());
        std::fs::write(&entry, b"garbage").unwrap();

        assert!(cache.get(&key).await.unwrap().is_none());
        // Corrupt entry was removed, not left behind
        assert!(!entry.exists());
    }

    #[tokio::test]
    async fn disk_cache_counts_hits_and_misses() {
        let dir = tempfile::tempdir().unwrap();
        let cache = open_cache(dir.path()).await;
        let key = ContentHash::compute(b"counted");

        assert!(cache.get(&key).await.unwrap().is_none());
        cache.put(&key, b"payload").await.unwrap();
        assert!(cache.get(&key).await.unwrap().is_some());
        assert!(cache.get(&key).await.unwrap().is_some());

        let stats = cache.stats().await.unwrap();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entry_count, 1);
    }

    #[tokio::test]
    async fn disk_cache_put_fails_when_dir_is_unwritable() {
        let dir = tempfile::tempdir().unwrap();
        // A file where the cache directory should be
        let blocked = dir.path().join("blocked");
        std::fs::write(&blocked, b"not a directory").unwrap();

        let cache = DiskCache::new(&blocked);
        let key = ContentHash::compute(b"anything");
        let result = cache.put(&key, b"payload").await;
        assert!(matches!(result, Err(CacheError::Io { .. })));
    }
}
