//! Image format detection

use std::path::Path;

/// Image format, detected from the file extension
///
/// Only [`Png`](Self::Png) and [`Jpeg`](Self::Jpeg) are recompressed;
/// the remaining kinds are recognized so the pipeline can log and copy
/// them through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    /// Portable Network Graphics
    Png,
    /// JPEG / JFIF
    Jpeg,
    /// Graphics Interchange Format
    Gif,
    /// WebP
    WebP,
    /// Scalable Vector Graphics
    Svg,
    /// Anything else matched by the source glob
    Other,
}

impl ImageKind {
    /// Detect the kind from a path's extension (case-insensitive)
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return Self::Other;
        };
        match ext.to_lowercase().as_str() {
            "png" => Self::Png,
            "jpg" | "jpeg" => Self::Jpeg,
            "gif" => Self::Gif,
            "webp" => Self::WebP,
            "svg" => Self::Svg,
            _ => Self::Other,
        }
    }

    /// Stable lowercase name, used in logs and cache keys
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::WebP => "webp",
            Self::Svg => "svg",
            Self::Other => "other",
        }
    }

    /// Whether the pipeline has a codec for this kind
    #[inline]
    #[must_use]
    pub const fn is_compressible(&self) -> bool {
        matches!(self, Self::Png | Self::Jpeg)
    }
}
