//! Cache error types

use std::path::{Path, PathBuf};

/// Errors from the cache store itself
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// I/O failure against the backing store
    #[error("cache I/O error at '{path}': {source}")]
    Io {
        /// Path the operation was touching
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl CacheError {
    /// Helper to create an I/O error with path context
    pub fn io_error(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Errors from the populate path of [`get_or_populate`]
///
/// Keeps the producer's failure separate from store failures so callers
/// can report "your image is broken" differently from "the cache
/// directory is unwritable".
///
/// [`get_or_populate`]: crate::get_or_populate
#[derive(Debug, thiserror::Error)]
pub enum PopulateError<E> {
    /// The backing store failed
    #[error("cache store error")]
    Cache(#[source] CacheError),

    /// The producer failed; nothing was stored
    #[error("cache producer failed")]
    Produce(#[source] E),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_carries_path() {
        let err = CacheError::io_error(
            "/tmp/cache/abc",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/cache/abc"));
        assert!(msg.contains("denied"));
    }
}
