//! Decoded source image and its content hash

use image::RgbaImage;
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::fs;
use tracing::debug;

use crate::errors::{IconError, IconResult};

/// Decoded RGBA source plus the digest used as the primary cache key
#[derive(Debug, Clone)]
pub struct SourceImage {
    pixels: RgbaImage,
    content_hash: String,
}

impl SourceImage {
    /// Wrap an already decoded buffer
    pub fn from_pixels(pixels: RgbaImage) -> Self {
        let content_hash = Self::compute_content_hash(&pixels);
        Self {
            pixels,
            content_hash,
        }
    }

    /// Decode encoded image bytes; `path` is only used for error messages
    pub fn decode(bytes: &[u8], path: &Path) -> IconResult<Self> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| IconError::decode(path, format!("not a valid image: {e}")))?;
        if decoded.width() == 0 || decoded.height() == 0 {
            return Err(IconError::decode(path, "image has no pixels"));
        }
        Ok(Self::from_pixels(decoded.to_rgba8()))
    }

    /// Read and decode an image file
    pub async fn load(path: &Path) -> IconResult<Self> {
        let bytes = fs::read(path)
            .await
            .map_err(|e| IconError::decode(path, e.to_string()))?;
        let source = Self::decode(&bytes, path)?;
        debug!(
            "Decoded source icon {} ({}x{}, hash {})",
            path.display(),
            source.width(),
            source.height(),
            source.content_hash
        );
        Ok(source)
    }

    /// SHA256 over the dimensions and raw RGBA pixels
    ///
    /// File path, container format and metadata do not contribute, so the
    /// same artwork re-encoded or moved hashes identically.
    pub fn compute_content_hash(pixels: &RgbaImage) -> String {
        let mut hasher = Sha256::new();
        hasher.update(pixels.width().to_be_bytes());
        hasher.update(pixels.height().to_be_bytes());
        hasher.update(pixels.as_raw());
        hex::encode(hasher.finalize())
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }
}
