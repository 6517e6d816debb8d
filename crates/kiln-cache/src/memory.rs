//! In-process cache store
//!
//! Drop-in stand-in for [`DiskCache`] in tests and ephemeral runs.
//! Nothing survives the process.
//!
//! [`DiskCache`]: crate::DiskCache

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use kiln_asset::ContentHash;
use parking_lot::RwLock;

use crate::error::CacheError;
use crate::store::{AssetCache, CacheStats};

/// Cache store held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<ContentHash, Vec<u8>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryCache {
    /// Create an empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the store holds no entries
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl AssetCache for MemoryCache {
    async fn get(&self, key: &ContentHash) -> Result<Option<Vec<u8>>, CacheError> {
        let found = self.entries.read().get(key).cloned();
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        Ok(found)
    }

    async fn put(&self, key: &ContentHash, bytes: &[u8]) -> Result<(), CacheError> {
        self.entries.write().insert(*key, bytes.to_vec());
        Ok(())
    }

    async fn contains(&self, key: &ContentHash) -> Result<bool, CacheError> {
        Ok(self.entries.read().contains_key(key))
    }

    async fn clear_all(&self) -> Result<u64, CacheError> {
        let mut entries = self.entries.write();
        let removed = entries.len() as u64;
        entries.clear();
        Ok(removed)
    }

    async fn stats(&self) -> Result<CacheStats, CacheError> {
        let entries = self.entries.read();
        Ok(CacheStats {
            entry_count: entries.len() as u64,
            total_bytes: entries.values().map(|v| v.len() as u64).sum(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_cache_put_and_get() {
        let cache = MemoryCache::new();
        let key = ContentHash::compute(b"key");

        cache.put(&key, b"value").await.unwrap();

        assert_eq!(cache.get(&key).await.unwrap().as_deref(), Some(b"value".as_slice()));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn memory_cache_clear_all() {
        let cache = MemoryCache::new();
        for i in 0..4u8 {
            cache.put(&ContentHash::compute(&[i]), &[i]).await.unwrap();
        }

        assert_eq!(cache.clear_all().await.unwrap(), 4);
        assert!(cache.is_empty());
        assert_eq!(cache.clear_all().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn memory_cache_stats() {
        let cache = MemoryCache::new();
        let key = ContentHash::compute(b"stat");

        assert!(cache.get(&key).await.unwrap().is_none());
        cache.put(&key, b"12345").await.unwrap();
        assert!(cache.get(&key).await.unwrap().is_some());

        let stats = cache.stats().await.unwrap();
        assert_eq!(stats.entry_count, 1);
        assert_eq!(stats.total_bytes, 5);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }
}
