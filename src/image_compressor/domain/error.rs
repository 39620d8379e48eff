use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // declared media type does not start with `image/`
    #[error("{name} is not an image (declared type: {media_type})")]
    NotAnImage { name: String, media_type: String },

    #[error("Quality must be between 0 and 100, got {0}")]
    InvalidQuality(u32),
}
