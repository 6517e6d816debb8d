//! Kiln Asset Primitives
//!
//! Content addressing and path handling shared by the pipeline crates.
//!
//! # Core Concepts
//!
//! - [`ContentHash`]: 32-byte Blake3 hash used to key the optimization
//!   cache and to verify stored entries on the way back out
//! - [`AssetPath`]: validated relative path of an asset below its source
//!   root, used to mirror source structure into the destination tree
//!
//! # Example
//!
//! ```rust
//! use kiln_asset::{AssetPath, ContentHash};
//!
//! let hash = ContentHash::compute(b"image bytes");
//! let path: AssetPath = "images/logos/kiln.png".parse().unwrap();
//! assert_eq!(path.file_name(), Some("kiln.png"));
//! assert_eq!(hash.to_string().len(), 64);
//! ```

#![warn(unreachable_pub)]

// Core modules
mod hash;
mod path;

// Re-exports
pub use hash::{ContentHash, HashError};
pub use path::{AssetPath, PathError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
