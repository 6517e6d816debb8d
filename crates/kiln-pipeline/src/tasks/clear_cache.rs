//! Clear-cache task
//!
//! Drops every cache entry, hit or not. The next images run repopulates
//! the cache from scratch.

use tracing::info;

use kiln_cache::AssetCache;

use crate::error::PipelineError;

/// What the clear-cache task did
#[derive(Debug, Clone, Copy, Default)]
pub struct ClearCacheReport {
    /// Entries dropped from the store
    pub entries_removed: u64,
}

impl ClearCacheReport {
    /// One-line human summary
    #[must_use]
    pub fn summary(&self) -> String {
        format!("removed {} cache entries", self.entries_removed)
    }
}

/// Run the clear-cache task
///
/// Clears unconditionally and returns only once the store confirms the
/// entries are gone.
///
/// # Errors
/// Returns error if the backing store fails.
pub async fn run<C>(cache: &C) -> Result<ClearCacheReport, PipelineError>
where
    C: AssetCache + ?Sized,
{
    let entries_removed = cache.clear_all().await?;
    info!(entries_removed, "cache cleared");
    Ok(ClearCacheReport { entries_removed })
}
