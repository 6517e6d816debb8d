//! Kiln Image Codecs
//!
//! Recompresses PNG and JPEG assets for the images task; everything else
//! passes through untouched. The output of [`optimize`] is never larger
//! than its input, so running the pipeline can only shrink a site.
//!
//! # Core Concepts
//!
//! - [`ImageKind`]: format detected from the file extension
//! - [`CodecConfig`]: per-format compression parameters with a stable
//!   digest for cache keying
//! - [`optimize`]: decode, re-encode, keep whichever is smaller
//!
//! # Example
//!
//! ```rust,ignore
//! use kiln_image::{optimize, CodecConfig, ImageKind};
//!
//! let kind = ImageKind::from_path("app/images/logo.png".as_ref());
//! let optimized = optimize(&bytes, kind, &CodecConfig::default())?;
//! assert!(optimized.len() <= bytes.len());
//! ```

#![warn(unreachable_pub)]

// Core modules
mod codec;
mod error;
mod format;

// Re-exports
pub use codec::{optimize, CodecConfig, JpegConfig, PngCompression, PngConfig};
pub use error::ImageError;
pub use format::ImageKind;
