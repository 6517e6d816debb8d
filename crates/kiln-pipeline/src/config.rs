//! Pipeline configuration
//!
//! Read from `kiln.toml` at the site root. Every field has a default,
//! so an absent file configures a working pipeline: images are
//! optimized into `dist/images`, pages render into `dist`, and the
//! code block gate stays off until switched on explicitly.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use kiln_image::CodecConfig;
use kiln_page::GatePolicy;

use crate::error::PipelineError;

/// Top-level pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Re-encode images on the way to the destination
    ///
    /// When off, the images task copies every file byte for byte.
    pub optimize_images: bool,
    /// Directory holding the persistent image cache
    pub cache_dir: PathBuf,
    /// Images task settings
    pub images: ImagesConfig,
    /// Pages task settings
    pub pages: PagesConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            optimize_images: true,
            cache_dir: PathBuf::from(".kiln-cache"),
            images: ImagesConfig::default(),
            pages: PagesConfig::default(),
        }
    }
}

/// Settings for the images task
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    /// Glob pattern selecting source images
    pub src: String,
    /// Destination directory mirroring the matched layout
    pub dest: PathBuf,
    /// Codec settings applied when optimization is on
    pub codec: CodecConfig,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            src: "app/images/**/*".to_owned(),
            dest: PathBuf::from("dist/images"),
            codec: CodecConfig::default(),
        }
    }
}

/// Settings for the pages task
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PagesConfig {
    /// Glob pattern selecting Markdown sources
    pub src: String,
    /// Destination directory for rendered HTML
    pub dest: PathBuf,
    /// Code block gate policy
    pub gate: GatePolicy,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            src: "app/pages/**/*.md".to_owned(),
            dest: PathBuf::from("dist"),
            gate: GatePolicy::default(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from `path`
    ///
    /// An absent file yields the defaults.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read or parsed,
    /// or if its codec settings fail validation.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no configuration file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => return Err(PipelineError::io_error(path, source)),
        };

        let config: Self = toml::from_str(&text).map_err(|source| PipelineError::Config {
            path: path.to_owned(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values serde cannot reject
    ///
    /// # Errors
    /// Returns error if the codec settings are unusable.
    pub fn validate(&self) -> Result<(), PipelineError> {
        self.images.codec.validate().map_err(PipelineError::Codec)
    }
}
