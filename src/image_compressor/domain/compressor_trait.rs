use crate::domain::compression_options::CompressionOptions;
use crate::infrastructure::error::InfrastructureError;

/// Capability that turns image bytes into (ideally) smaller image bytes.
/// Backends are free to decode, resize and re-encode however they like.
#[cfg_attr(test, mockall::automock)]
pub trait ImageCompressor {
    fn compress(
        &self,
        image_bytes: &[u8],
        options: &CompressionOptions,
    ) -> Result<Vec<u8>, InfrastructureError>;
}
