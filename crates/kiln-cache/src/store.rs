//! The cache capability consumed by pipeline tasks

use std::future::Future;

use async_trait::async_trait;
use kiln_asset::ContentHash;

use crate::error::{CacheError, PopulateError};

/// Statistics for cache performance monitoring
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Number of entries in the store
    pub entry_count: u64,
    /// Total stored bytes (payload plus framing)
    pub total_bytes: u64,
    /// Lookups served from the store this run
    pub hits: u64,
    /// Lookups that fell through to the producer this run
    pub misses: u64,
}

/// Persistent optimization cache
///
/// Tasks receive this as an injected capability rather than reaching for
/// a process-wide store, so tests can substitute [`MemoryCache`].
///
/// Entries are opaque bytes keyed by [`ContentHash`]: present or absent,
/// clearable in bulk. Eviction policy is out of scope; entries live until
/// `clear_all`.
///
/// [`MemoryCache`]: crate::MemoryCache
#[async_trait]
pub trait AssetCache: Send + Sync {
    /// Look up an entry
    ///
    /// # Errors
    /// Returns error if the backing store fails. An absent entry is
    /// `Ok(None)`, not an error.
    async fn get(&self, key: &ContentHash) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store an entry, replacing any previous value for the key
    ///
    /// # Errors
    /// Returns error if the backing store cannot be written.
    async fn put(&self, key: &ContentHash, bytes: &[u8]) -> Result<(), CacheError>;

    /// Check whether an entry exists without reading it
    ///
    /// # Errors
    /// Returns error if the backing store fails.
    async fn contains(&self, key: &ContentHash) -> Result<bool, CacheError>;

    /// Remove every entry, returning how many were removed
    ///
    /// # Errors
    /// Returns error if the backing store cannot be cleared.
    async fn clear_all(&self) -> Result<u64, CacheError>;

    /// Get cache statistics
    ///
    /// # Errors
    /// Returns error if the backing store cannot be inspected.
    async fn stats(&self) -> Result<CacheStats, CacheError>;
}

/// Get a cached value, or run `producer` and store its output
///
/// The consult-or-populate path the images task runs per file: a hit
/// skips the producer entirely; a miss runs it once and persists the
/// result before returning it.
///
/// # Errors
/// Returns [`PopulateError::Cache`] if the store fails, and
/// [`PopulateError::Produce`] if the producer fails (in which case
/// nothing is stored).
pub async fn get_or_populate<C, F, Fut, E>(
    cache: &C,
    key: ContentHash,
    producer: F,
) -> Result<Vec<u8>, PopulateError<E>>
where
    C: AssetCache + ?Sized,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<u8>, E>>,
{
    if let Some(bytes) = cache.get(&key).await.map_err(PopulateError::Cache)? {
        return Ok(bytes);
    }

    let bytes = producer().await.map_err(PopulateError::Produce)?;
    cache.put(&key, &bytes).await.map_err(PopulateError::Cache)?;
    Ok(bytes)
}
