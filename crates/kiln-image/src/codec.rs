//! PNG and JPEG recompression
//!
//! One pure function: bytes in, bytes out. The caller decides whether to
//! consult a cache around it; the codec itself holds no state.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, ImageFormat};
use kiln_asset::ContentHash;
use serde::{Deserialize, Serialize};

use crate::error::ImageError;
use crate::format::ImageKind;

/// PNG compression effort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PngCompression {
    /// Fastest, largest output
    Fast,
    /// The encoder's balanced setting
    Default,
    /// Slowest, smallest output
    #[default]
    Best,
}

impl PngCompression {
    /// Stable lowercase name, used in the config digest
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Default => "default",
            Self::Best => "best",
        }
    }
}

impl From<PngCompression> for CompressionType {
    fn from(value: PngCompression) -> Self {
        match value {
            PngCompression::Fast => CompressionType::Fast,
            PngCompression::Default => CompressionType::Default,
            PngCompression::Best => CompressionType::Best,
        }
    }
}

/// PNG codec parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PngConfig {
    /// Compression effort
    pub compression: PngCompression,
}

/// JPEG codec parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JpegConfig {
    /// Quality, 1-100
    pub quality: u8,
}

impl Default for JpegConfig {
    fn default() -> Self {
        Self { quality: 80 }
    }
}

impl JpegConfig {
    /// Check the quality range
    ///
    /// # Errors
    /// Returns error if quality is 0 or above 100.
    pub fn validate(&self) -> Result<(), ImageError> {
        if self.quality == 0 || self.quality > 100 {
            return Err(ImageError::InvalidJpegQuality {
                quality: self.quality,
            });
        }
        Ok(())
    }
}

/// Per-format compression parameters
///
/// Carried opaquely from configuration to the codecs. The digest feeds
/// the cache key, so changing any parameter invalidates prior results
/// without touching the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// PNG parameters
    pub png: PngConfig,
    /// JPEG parameters
    pub jpeg: JpegConfig,
}

impl CodecConfig {
    /// Check all parameter ranges
    ///
    /// # Errors
    /// Returns error if any per-format parameter is out of range.
    pub fn validate(&self) -> Result<(), ImageError> {
        self.jpeg.validate()
    }

    /// Stable digest over every parameter
    #[must_use]
    pub fn digest(&self) -> ContentHash {
        ContentHash::compute_parts(&[
            b"png",
            self.png.compression.name().as_bytes(),
            b"jpeg",
            &[self.jpeg.quality],
        ])
    }
}

/// Recompress an image, keeping the input when re-encoding does not shrink it
///
/// Non-compressible kinds pass through unchanged. The result is
/// deterministic for a given input and configuration, and its length
/// never exceeds the input's.
///
/// # Errors
/// Returns error if the input does not decode as its detected format, if
/// re-encoding fails, or if the configuration is out of range.
pub fn optimize(bytes: &[u8], kind: ImageKind, config: &CodecConfig) -> Result<Vec<u8>, ImageError> {
    match kind {
        ImageKind::Png => reencode_png(bytes, &config.png),
        ImageKind::Jpeg => reencode_jpeg(bytes, &config.jpeg),
        _ => Ok(bytes.to_vec()),
    }
}

fn reencode_png(bytes: &[u8], config: &PngConfig) -> Result<Vec<u8>, ImageError> {
    let img = image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .map_err(|e| ImageError::decode(ImageKind::Png, e))?;

    let mut out = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut out, config.compression.into(), FilterType::Adaptive);
    img.write_with_encoder(encoder)
        .map_err(|e| ImageError::encode(ImageKind::Png, e))?;

    Ok(keep_smaller(bytes, out))
}

fn reencode_jpeg(bytes: &[u8], config: &JpegConfig) -> Result<Vec<u8>, ImageError> {
    config.validate()?;

    let img = image::load_from_memory_with_format(bytes, ImageFormat::Jpeg)
        .map_err(|e| ImageError::decode(ImageKind::Jpeg, e))?;

    // JPEG carries no alpha channel
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());

    let mut out = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut out, config.quality);
    rgb.write_with_encoder(encoder)
        .map_err(|e| ImageError::encode(ImageKind::Jpeg, e))?;

    Ok(keep_smaller(bytes, out))
}

fn keep_smaller(original: &[u8], reencoded: Vec<u8>) -> Vec<u8> {
    if reencoded.len() < original.len() {
        reencoded
    } else {
        original.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_png(compression: CompressionType) -> Vec<u8> {
        let img = image::RgbaImage::from_fn(64, 64, |x, y| {
            image::Rgba([(x * 4) as u8, (y * 4) as u8, ((x + y) * 2) as u8, 255])
        });
        let mut out = Vec::new();
        let encoder = PngEncoder::new_with_quality(&mut out, compression, FilterType::NoFilter);
        DynamicImage::ImageRgba8(img)
            .write_with_encoder(encoder)
            .unwrap();
        out
    }

    fn gradient_jpeg(quality: u8) -> Vec<u8> {
        let img = image::RgbImage::from_fn(64, 64, |x, y| {
            image::Rgb([(x * 4) as u8, (y * 4) as u8, ((x + y) * 2) as u8])
        });
        let mut out = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut out, quality);
        DynamicImage::ImageRgb8(img)
            .write_with_encoder(encoder)
            .unwrap();
        out
    }

    #[test]
    fn optimize_png_never_grows_and_stays_decodable() {
        let input = gradient_png(CompressionType::Fast);
        let out = optimize(&input, ImageKind::Png, &CodecConfig::default()).unwrap();

        assert!(out.len() <= input.len());
        image::load_from_memory_with_format(&out, ImageFormat::Png).unwrap();
    }

    #[test]
    fn optimize_jpeg_never_grows_and_stays_decodable() {
        let input = gradient_jpeg(95);
        let out = optimize(&input, ImageKind::Jpeg, &CodecConfig::default()).unwrap();

        assert!(out.len() <= input.len());
        image::load_from_memory_with_format(&out, ImageFormat::Jpeg).unwrap();
    }

    #[test]
    fn optimize_is_deterministic() {
        let input = gradient_png(CompressionType::Fast);
        let config = CodecConfig::default();

        let first = optimize(&input, ImageKind::Png, &config).unwrap();
        let second = optimize(&input, ImageKind::Png, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn optimize_passes_through_unknown_kinds() {
        let input = b"GIF89a not really a gif".to_vec();
        let out = optimize(&input, ImageKind::Gif, &CodecConfig::default()).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn optimize_rejects_corrupt_input() {
        let result = optimize(b"not a png", ImageKind::Png, &CodecConfig::default());
        assert!(matches!(result, Err(ImageError::Decode { kind: "png", .. })));
    }

    #[test]
    fn jpeg_quality_range_is_enforced() {
        let input = gradient_jpeg(80);
        for quality in [0u8, 101] {
            let config = CodecConfig {
                jpeg: JpegConfig { quality },
                ..CodecConfig::default()
            };
            let result = optimize(&input, ImageKind::Jpeg, &config);
            assert!(matches!(result, Err(ImageError::InvalidJpegQuality { .. })));
        }
    }

    #[test]
    fn digest_tracks_parameters() {
        let base = CodecConfig::default();
        let tweaked = CodecConfig {
            jpeg: JpegConfig { quality: 60 },
            ..base
        };

        assert_eq!(base.digest(), CodecConfig::default().digest());
        assert_ne!(base.digest(), tweaked.digest());
    }

    #[test]
    fn keep_smaller_prefers_original_on_tie() {
        let original = vec![1u8, 2, 3];
        let reencoded = vec![9u8, 9, 9];
        assert_eq!(keep_smaller(&original, reencoded), original);
    }
}
