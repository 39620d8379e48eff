use std::sync::Arc;

use tracing::{debug, info, warn};

use super::error::ApplicationError;
use crate::domain::compressed_result::CompressedResult;
use crate::domain::compression_options::{CompressionOptions, FALLBACK_QUALITY};
use crate::domain::compressor_trait::ImageCompressor;
use crate::domain::file_size::format_file_size;
use crate::domain::quality::Quality;
use crate::domain::source_image::SourceImage;
use crate::infrastructure::error::InfrastructureError;

/// Derives options for a source, runs the compressor and applies the
/// one-shot quality fallback.
#[derive(Clone)]
pub struct CompressionService {
    compressor: Arc<dyn ImageCompressor + Send + Sync>, // trait object, any backend can be injected
    background_worker: bool,
}

impl CompressionService {
    pub fn new(compressor: Arc<dyn ImageCompressor + Send + Sync>) -> Self {
        Self {
            compressor,
            background_worker: true,
        }
    }

    /// With `false`, the compressor runs on the calling task instead of the blocking pool.
    pub fn with_background_worker(mut self, enabled: bool) -> Self {
        self.background_worker = enabled;
        self
    }

    async fn run_once(
        &self,
        source: &SourceImage,
        options: CompressionOptions,
    ) -> Result<Vec<u8>, InfrastructureError> {
        debug!("Compressing {} with {:?}", source.name, options);
        if !options.use_web_worker {
            return self.compressor.compress(&source.data, &options);
        }

        // decoding and encoding are CPU bound, keep them off the async workers
        let compressor = self.compressor.clone();
        let data = source.data.clone();
        tokio::task::spawn_blocking(move || compressor.compress(&data, &options))
            .await
            .map_err(|e| InfrastructureError::WorkerError(e.to_string()))?
    }

    pub async fn compress(
        &self,
        source: &SourceImage,
        quality: Quality,
    ) -> Result<CompressedResult, ApplicationError> {
        let mut options = CompressionOptions::for_source(source, quality.fraction());
        options.use_web_worker = self.background_worker;
        info!(
            "Compressing {} ({}) at {}",
            source.name,
            format_file_size(source.size()),
            quality.label()
        );

        let mut used_quality = options.quality;
        let mut used_fallback = false;
        let mut data = self
            .run_once(source, options.clone())
            .await
            .map_err(ApplicationError::CompressionFailed)?;

        if data.len() as u64 >= source.size() && options.quality > FALLBACK_QUALITY {
            info!(
                "Result for {} is not smaller ({} >= {}), retrying at quality {}",
                source.name,
                data.len(),
                source.size(),
                FALLBACK_QUALITY
            );
            data = self
                .run_once(source, options.with_quality(FALLBACK_QUALITY))
                .await
                .map_err(ApplicationError::CompressionFailed)?;
            used_quality = FALLBACK_QUALITY;
            used_fallback = true;
        }

        let result = CompressedResult {
            data: data.into(),
            original_size: source.size(),
            quality: used_quality,
            used_fallback,
        };
        if !result.is_smaller() {
            warn!("{} did not get smaller: {}", source.name, result.summary());
        }
        Ok(result)
    }
}
