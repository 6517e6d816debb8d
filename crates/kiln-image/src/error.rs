//! Codec error types

use crate::format::ImageKind;

/// Errors from the image codecs
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    /// Input bytes did not decode as the detected format
    #[error("failed to decode {kind} image: {source}")]
    Decode {
        /// Detected format
        kind: &'static str,
        /// Underlying decoder error
        #[source]
        source: image::ImageError,
    },

    /// Re-encoding failed
    #[error("failed to encode {kind} image: {source}")]
    Encode {
        /// Target format
        kind: &'static str,
        /// Underlying encoder error
        #[source]
        source: image::ImageError,
    },

    /// JPEG quality outside the valid range
    #[error("invalid jpeg quality {quality}: must be within 1-100")]
    InvalidJpegQuality {
        /// Configured quality value
        quality: u8,
    },
}

impl ImageError {
    /// Helper to create a decode error for a format
    pub fn decode(kind: ImageKind, source: image::ImageError) -> Self {
        Self::Decode {
            kind: kind.name(),
            source,
        }
    }

    /// Helper to create an encode error for a format
    pub fn encode(kind: ImageKind, source: image::ImageError) -> Self {
        Self::Encode {
            kind: kind.name(),
            source,
        }
    }
}
