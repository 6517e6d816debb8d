//! Relative asset paths
//!
//! Provides [`AssetPath`], the path of an asset below its source root.
//! Destination files are written at the same relative path below the
//! destination root, which is what mirrors the source tree structure.

use std::fmt::{self, Display, Formatter};
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

/// Relative path of an asset below a source or destination root
///
/// Always relative, always forward-slash in display form, and never
/// escapes its root: absolute paths and `..` segments are rejected at
/// construction.
///
/// # Examples
/// - `images/logos/kiln.png`
/// - `pages/guide/install.md`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssetPath(Vec<String>);

impl AssetPath {
    /// Build from validated segments
    ///
    /// # Errors
    /// Returns error if no segments are given or any segment is empty,
    /// `.`, `..`, or contains a path separator.
    pub fn new(segments: Vec<String>) -> Result<Self, PathError> {
        if segments.is_empty() {
            return Err(PathError::Empty);
        }
        for seg in &segments {
            validate_segment(seg)?;
        }
        Ok(Self(segments))
    }

    /// Build from a filesystem path, which must be relative
    ///
    /// `.` components are dropped; `..` components and absolute paths are
    /// rejected.
    ///
    /// # Errors
    /// Returns error for absolute paths, traversal components, non-UTF-8
    /// components, or a path with no remaining segments.
    pub fn from_path(path: &Path) -> Result<Self, PathError> {
        let mut segments = Vec::new();
        for component in path.components() {
            match component {
                Component::Normal(os) => {
                    let seg = os
                        .to_str()
                        .ok_or_else(|| PathError::NotUtf8(path.display().to_string()))?;
                    validate_segment(seg)?;
                    segments.push(seg.to_string());
                }
                Component::CurDir => {}
                Component::ParentDir => {
                    return Err(PathError::Traversal(path.display().to_string()));
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(PathError::Absolute(path.display().to_string()));
                }
            }
        }
        if segments.is_empty() {
            return Err(PathError::Empty);
        }
        Ok(Self(segments))
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Final segment (the file name)
    #[inline]
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// File name without its extension
    #[inline]
    #[must_use]
    pub fn file_stem(&self) -> Option<&str> {
        self.file_name()
            .and_then(|name| Path::new(name).file_stem())
            .and_then(|stem| stem.to_str())
    }

    /// Extension of the final segment, lowercased
    #[inline]
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        self.file_name()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
    }

    /// Same path with the file extension replaced
    #[must_use]
    pub fn with_extension(&self, ext: &str) -> Self {
        let mut segments = self.0.clone();
        if let Some(last) = segments.last_mut() {
            let mut name = PathBuf::from(last.as_str());
            name.set_extension(ext);
            if let Some(replaced) = name.to_str() {
                *last = replaced.to_string();
            }
        }
        Self(segments)
    }

    /// Join below a root directory, producing a filesystem path
    #[must_use]
    pub fn below(&self, root: &Path) -> PathBuf {
        let mut out = root.to_path_buf();
        for seg in &self.0 {
            out.push(seg);
        }
        out
    }

    /// Convert to a relative filesystem path
    #[inline]
    #[must_use]
    pub fn to_path_buf(&self) -> PathBuf {
        self.0.iter().collect()
    }
}

fn validate_segment(seg: &str) -> Result<(), PathError> {
    if seg.is_empty() {
        return Err(PathError::EmptySegment);
    }
    if seg == "." || seg == ".." {
        return Err(PathError::Traversal(seg.to_string()));
    }
    if seg.contains(['/', '\\']) {
        return Err(PathError::InvalidSegment(seg.to_string()));
    }
    Ok(())
}

impl Display for AssetPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

impl FromStr for AssetPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with('/') {
            return Err(PathError::Absolute(s.to_string()));
        }
        let segments: Vec<String> = s
            .split('/')
            .filter(|seg| *seg != ".")
            .map(|seg| {
                validate_segment(seg)?;
                Ok(seg.to_string())
            })
            .collect::<Result<_, PathError>>()?;
        if segments.is_empty() {
            return Err(PathError::Empty);
        }
        Ok(Self(segments))
    }
}

impl TryFrom<&Path> for AssetPath {
    type Error = PathError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        Self::from_path(path)
    }
}

/// Errors related to asset paths
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    /// Path resolved to zero segments
    #[error("asset path is empty")]
    Empty,

    /// Empty segment in path
    #[error("asset path contains empty segment")]
    EmptySegment,

    /// Segment contains a separator
    #[error("invalid path segment: {0:?}")]
    InvalidSegment(String),

    /// Path escapes its root
    #[error("path traverses outside its root: {0}")]
    Traversal(String),

    /// Absolute paths cannot mirror a source tree
    #[error("asset path must be relative: {0}")]
    Absolute(String),

    /// Non-UTF-8 path component
    #[error("asset path is not valid UTF-8: {0}")]
    NotUtf8(String),
}
