//! Kiln Optimization Cache
//!
//! A persistent store for expensive asset transforms, keyed by content
//! hash. The images task consults it before recompressing a file; the
//! clear-cache task empties it in bulk.
//!
//! # Core Concepts
//!
//! - [`AssetCache`]: the injected capability tasks operate against -
//!   `get`, `put`, `clear_all`, `stats`
//! - [`get_or_populate`]: miss path runs an async producer and stores its
//!   output; producer and store failures stay distinct
//! - [`DiskCache`]: production store, one checksummed file per entry
//! - [`MemoryCache`]: in-process store for tests and ephemeral runs
//!
//! # Example
//!
//! ```rust,no_run
//! use kiln_asset::ContentHash;
//! use kiln_cache::{get_or_populate, AssetCache, DiskCache};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let cache = DiskCache::new(".kiln-cache");
//! cache.init().await?;
//!
//! let key = ContentHash::compute(b"source image bytes");
//! let optimized = get_or_populate(&cache, key, || async {
//!     Ok::<_, std::io::Error>(vec![1, 2, 3])
//! })
//! .await?;
//! # let _ = optimized;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

// Core modules
mod disk;
mod error;
mod memory;
mod store;

// Re-exports
pub use disk::DiskCache;
pub use error::{CacheError, PopulateError};
pub use memory::MemoryCache;
pub use store::{get_or_populate, AssetCache, CacheStats};
