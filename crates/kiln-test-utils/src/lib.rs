//! Testing utilities for the kiln workspace
//!
//! Shared fixtures and site-tree builders.

#![allow(missing_docs)]

use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, ImageBuffer, Rgb, Rgba};

/// Small gradient PNG, lightly compressed so the optimizer has room
pub fn sample_png() -> Vec<u8> {
    let img = ImageBuffer::from_fn(64, 64, |x, y| {
        Rgba([(x * 4) as u8, (y * 4) as u8, ((x + y) * 2) as u8, 255])
    });
    let mut out = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut out, CompressionType::Fast, FilterType::NoFilter);
    DynamicImage::ImageRgba8(img)
        .write_with_encoder(encoder)
        .unwrap();
    out
}

/// Small gradient JPEG at high quality
pub fn sample_jpeg() -> Vec<u8> {
    let img = ImageBuffer::from_fn(64, 64, |x, y| Rgb([(x * 4) as u8, 128, (y * 4) as u8]));
    let mut out = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut out, 95);
    DynamicImage::ImageRgb8(img)
        .write_with_encoder(encoder)
        .unwrap();
    out
}

/// Tiny SVG, which the images task never re-encodes
pub fn sample_svg() -> Vec<u8> {
    br##"<svg xmlns="http://www.w3.org/2000/svg" width="8" height="8"><rect width="8" height="8" fill="#357"/></svg>"##
        .to_vec()
}

/// Truncated bytes that no decoder accepts
pub fn broken_png() -> Vec<u8> {
    let mut bytes = sample_png();
    bytes.truncate(24);
    bytes
}

/// Write a tree of files below `root`, creating directories as needed
pub fn write_tree(root: &Path, files: &[(&str, &[u8])]) {
    for (rel, bytes) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, bytes).unwrap();
    }
}

/// Markdown page with `n` Rust code blocks separated by prose
pub fn page_with_blocks(n: usize) -> String {
    let mut source = String::from("# Sample Page\n\n");
    for i in 0..n {
        source.push_str(&format!(
            "Paragraph {i}.\n\n```rust\nfn block_{i}() -> usize {{ {i} }}\n```\n\n"
        ));
    }
    source
}
