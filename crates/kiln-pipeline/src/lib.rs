//! Build tasks for the kiln site pipeline
//!
//! Each task takes sources matched by a glob pattern to files under a
//! destination directory, mirroring the source layout. Tasks run files
//! sequentially and report what they did.
//!
//! # Operations
//!
//! - [`tasks::images::run`]: optimize or copy images into the
//!   destination tree, backed by the persistent cache
//! - [`tasks::pages::run`]: render Markdown pages to HTML with
//!   highlighted, optionally gated code blocks
//! - [`tasks::clear_cache::run`]: drop every cache entry
//!
//! # Architecture
//!
//! ```text
//!   kiln.toml ──> PipelineConfig
//!                      │
//!        ┌─────────────┼─────────────┐
//!        ▼             ▼             ▼
//!   images task    pages task   clear-cache
//!        │             │
//!   AssetCache    PageProcessor
//!        │             │
//!        └──────┬──────┘
//!               ▼
//!             dist/
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! let config = PipelineConfig::load(Path::new("kiln.toml"))?;
//! let cache = DiskCache::new(&config.cache_dir);
//! cache.init().await?;
//!
//! let report = tasks::images::run(&config, &cache).await?;
//! println!("{}", report.summary());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
mod config;
mod error;
mod source;
pub mod tasks;

// Re-exports
pub use config::{ImagesConfig, PagesConfig, PipelineConfig};
pub use error::PipelineError;
pub use source::{collect_routes, AssetRoute};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
