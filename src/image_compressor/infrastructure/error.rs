use thiserror::Error; // derive Display and Error from the attributes below

#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("Compression failed: {0}")]
    CompressionFailed(String),

    // decode and encode failures from the image crate, `?` converts them
    #[error("Underlying image library error")]
    ImageLibError(#[from] image::ImageError),

    // reading sources and writing downloads
    #[error("Underlying I/O error")]
    IoError(#[from] std::io::Error),

    // malformed config JSON
    #[error("Invalid configuration")]
    ConfigError(#[from] serde_json::Error),

    // blocking-pool task panicked or was cancelled
    #[error("Background worker failed: {0}")]
    WorkerError(String),

    #[error("Object URL {0} has been revoked")]
    UrlRevoked(String),
}
