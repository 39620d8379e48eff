use serde::{Deserialize, Serialize};

use super::source_image::SourceImage;

const MB: u64 = 1024 * 1024;
pub const DEFAULT_MAX_DIMENSION: u32 = 1920;
pub const LARGE_INPUT_MAX_DIMENSION: u32 = 1600;
const LARGE_INPUT_THRESHOLD: u64 = 5 * MB;
const SMALL_INPUT_MAX_SIZE_MB: f64 = 0.5;
pub const MAX_ITERATION: u32 = 2;
pub const FALLBACK_QUALITY: f32 = 0.5;

/// Configuration handed to an [`ImageCompressor`](super::compressor_trait::ImageCompressor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionOptions {
    /// Target size ceiling in megabytes.
    #[serde(rename = "maxSizeMB")]
    pub max_size_mb: f64,
    pub max_width_or_height: u32,
    pub use_web_worker: bool,
    pub quality: f32,
    pub initial_quality: f32,
    pub always_keep_resolution: bool,
    pub max_iteration: u32,
}

impl CompressionOptions {
    pub fn for_source(source: &SourceImage, quality: f32) -> Self {
        let size_mb = source.size_mb();
        let max_size_mb = if size_mb > 1.0 {
            size_mb / 2.0
        } else {
            SMALL_INPUT_MAX_SIZE_MB
        };
        let max_width_or_height = if source.size() > LARGE_INPUT_THRESHOLD {
            LARGE_INPUT_MAX_DIMENSION
        } else {
            DEFAULT_MAX_DIMENSION
        };

        Self {
            max_size_mb,
            max_width_or_height,
            use_web_worker: true,
            quality,
            initial_quality: quality,
            always_keep_resolution: false,
            max_iteration: MAX_ITERATION,
        }
    }

    pub fn with_quality(mut self, quality: f32) -> Self {
        self.quality = quality;
        self.initial_quality = quality;
        self
    }

    pub fn max_size_bytes(&self) -> u64 {
        (self.max_size_mb * MB as f64) as u64
    }
}
