//! Pipeline error types

use std::path::{Path, PathBuf};

use kiln_asset::PathError;
use kiln_cache::CacheError;
use kiln_image::ImageError;

/// Errors from pipeline configuration and tasks
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Filesystem failure on a source or destination path
    #[error("I/O error at '{path}': {source}")]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Configuration file failed to parse
    #[error("invalid configuration '{path}': {source}")]
    Config {
        /// Configuration file path
        path: PathBuf,
        /// TOML parse error
        #[source]
        source: toml::de::Error,
    },

    /// Codec settings in the configuration are unusable
    #[error("invalid codec settings: {0}")]
    Codec(#[source] ImageError),

    /// A source glob pattern is malformed
    #[error("invalid source pattern '{pattern}': {source}")]
    Pattern {
        /// Offending pattern
        pattern: String,
        /// Pattern parse error
        #[source]
        source: glob::PatternError,
    },

    /// A matched path could not be read while walking sources
    #[error("failed to walk source files: {0}")]
    Glob(#[from] glob::GlobError),

    /// A source path cannot map into the destination tree
    #[error("unroutable source path '{path}': {source}")]
    Route {
        /// Source path that failed to route
        path: PathBuf,
        /// Reason the path is unroutable
        #[source]
        source: PathError,
    },

    /// Cache failure
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// An image failed to decode or re-encode
    #[error("image processing failed for '{path}': {source}")]
    Image {
        /// Source image path
        path: PathBuf,
        /// Codec error
        #[source]
        source: ImageError,
    },
}

impl PipelineError {
    pub(crate) fn io_error(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_owned(),
            source,
        }
    }
}
