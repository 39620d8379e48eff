use thiserror::Error;
use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;

pub const NOT_AN_IMAGE_NOTICE: &str = "Please select an image file!";
pub const COMPRESSION_FAILED_NOTICE: &str = "Compression failed, please retry";

#[derive(Error, Debug)]
pub enum ApplicationError {
    // no #[from]: a backend failure during a pass is wrapped explicitly,
    // other infrastructure errors go through the variant below
    #[error("Compression failed: {0}")]
    CompressionFailed(#[source] InfrastructureError),

    // rejected input, `?` converts it
    #[error("Domain error occurred: {0}")]
    DomainError(#[from] DomainError),

    #[error("Infrastructure error occurred: {0}")]
    InfrastructureError(#[from] InfrastructureError),
}

impl ApplicationError {
    /// Text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            ApplicationError::CompressionFailed(_) => COMPRESSION_FAILED_NOTICE.to_string(),
            ApplicationError::DomainError(DomainError::NotAnImage { .. }) => {
                NOT_AN_IMAGE_NOTICE.to_string()
            }
            // remaining errors already carry readable Display text
            ApplicationError::DomainError(domain_err) => domain_err.to_string(),
            ApplicationError::InfrastructureError(InfrastructureError::IoError(io_err)) => {
                format!("File error: {}", io_err)
            }
            ApplicationError::InfrastructureError(infra_err) => infra_err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let not_image = ApplicationError::from(DomainError::NotAnImage {
            name: "a.txt".to_string(),
            media_type: "text/plain".to_string(),
        });
        assert_eq!(not_image.user_message(), "Please select an image file!");

        let failed = ApplicationError::CompressionFailed(InfrastructureError::CompressionFailed(
            "boom".to_string(),
        ));
        assert_eq!(failed.user_message(), "Compression failed, please retry");

        let quality = ApplicationError::from(DomainError::InvalidQuality(120));
        assert_eq!(quality.user_message(), "Quality must be between 0 and 100, got 120");

        let io = ApplicationError::from(InfrastructureError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        )));
        assert_eq!(io.user_message(), "File error: missing");
    }
}
