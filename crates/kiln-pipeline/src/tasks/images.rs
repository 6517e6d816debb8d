//! Images task
//!
//! Mirrors every file matched by the images source pattern into the
//! destination directory. PNG and JPEG files are re-encoded through
//! the persistent cache when optimization is on; everything else, and
//! everything when it is off, is copied byte for byte.

use tokio::fs;
use tracing::debug;

use kiln_asset::ContentHash;
use kiln_cache::{get_or_populate, AssetCache, CacheStats, PopulateError};
use kiln_image::{optimize, CodecConfig, ImageKind};

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::source::collect_routes;

/// What the images task did
#[derive(Debug, Clone, Copy, Default)]
pub struct ImagesReport {
    /// Files written to the destination
    pub files: usize,
    /// Files that went through a codec
    pub optimized: usize,
    /// Files copied verbatim
    pub copied: usize,
    /// Total source bytes read
    pub bytes_in: u64,
    /// Total destination bytes written
    pub bytes_out: u64,
    /// Cache counters after the run
    pub cache: CacheStats,
}

impl ImagesReport {
    /// One-line human summary
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} files ({} optimized, {} copied), {} -> {} bytes, cache {} hits / {} misses",
            self.files,
            self.optimized,
            self.copied,
            self.bytes_in,
            self.bytes_out,
            self.cache.hits,
            self.cache.misses,
        )
    }
}

/// Run the images task
///
/// Files are processed sequentially in match order. Destination
/// directories are created as needed.
///
/// # Errors
/// Returns error if sources cannot be walked, a file cannot be read or
/// written, the cache fails, or a PNG/JPEG fails to re-encode.
pub async fn run<C>(config: &PipelineConfig, cache: &C) -> Result<ImagesReport, PipelineError>
where
    C: AssetCache + ?Sized,
{
    let routes = collect_routes(&config.images.src, &config.images.dest)?;
    let mut report = ImagesReport::default();

    for route in routes {
        let input = fs::read(&route.source)
            .await
            .map_err(|e| PipelineError::io_error(&route.source, e))?;
        let input_len = input.len() as u64;
        let kind = ImageKind::from_path(&route.source);

        let output = if config.optimize_images && kind.is_compressible() {
            let key = cache_key(&input, &config.images.codec, kind);
            let bytes = get_or_populate(cache, key, || async {
                optimize(&input, kind, &config.images.codec)
            })
            .await
            .map_err(|error| match error {
                PopulateError::Cache(source) => PipelineError::Cache(source),
                PopulateError::Produce(source) => PipelineError::Image {
                    path: route.source.clone(),
                    source,
                },
            })?;
            report.optimized += 1;
            bytes
        } else {
            report.copied += 1;
            input
        };

        if let Some(parent) = route.output.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| PipelineError::io_error(parent, e))?;
        }
        fs::write(&route.output, &output)
            .await
            .map_err(|e| PipelineError::io_error(&route.output, e))?;

        debug!(
            file = %route.relative,
            kind = kind.name(),
            bytes_in = input_len,
            bytes_out = output.len() as u64,
            "wrote image"
        );
        report.files += 1;
        report.bytes_in += input_len;
        report.bytes_out += output.len() as u64;
    }

    report.cache = cache.stats().await?;
    Ok(report)
}

/// Cache key for one source file
///
/// Keyed on content plus codec settings plus format, so editing a
/// file, retuning the codecs or renaming `.jpg` to `.png` all miss
/// instead of serving a stale entry. Moving a file without editing it
/// still hits.
fn cache_key(input: &[u8], codec: &CodecConfig, kind: ImageKind) -> ContentHash {
    let codec_digest = codec.digest();
    ContentHash::compute_parts(&[input, codec_digest.as_bytes(), kind.name().as_bytes()])
}
