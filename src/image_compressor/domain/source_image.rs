use std::sync::Arc;

use super::error::DomainError;

const IMAGE_MEDIA_PREFIX: &str = "image/";

/// A file as handed over by a picker or a drop, not yet checked.
#[derive(Debug, Clone)]
pub struct PickedFile {
    pub name: String,
    pub media_type: String,
    pub data: Vec<u8>,
}

impl PickedFile {
    pub fn into_source(self) -> Result<SourceImage, DomainError> {
        SourceImage::new(self.name, self.media_type, self.data)
    }
}

/// The file the user picked or dropped.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub name: String,
    pub media_type: String,
    pub data: Arc<[u8]>,
}

impl SourceImage {
    /// Accepts the file only when its declared media type is `image/*`.
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        data: impl Into<Arc<[u8]>>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        let media_type = media_type.into();
        if name.is_empty() {
            return Err(DomainError::InvalidInput("file name is empty".to_string()));
        }
        if !media_type.starts_with(IMAGE_MEDIA_PREFIX) {
            return Err(DomainError::NotAnImage { name, media_type });
        }
        Ok(Self {
            name,
            media_type,
            data: data.into(),
        })
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn size_mb(&self) -> f64 {
        self.size() as f64 / (1024.0 * 1024.0)
    }

    /// Name offered when the compressed copy is saved: `compressed_` plus the
    /// original name, extension included. The bytes may be in a different
    /// format than that extension suggests, since the native backend writes
    /// every non-PNG input (GIF, WebP, BMP, ...) as JPEG.
    pub fn download_name(&self) -> String {
        format!("compressed_{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_image_media_types() {
        let image = SourceImage::new("cat.jpg", "image/jpeg", vec![1, 2, 3]).unwrap();
        assert_eq!(image.size(), 3);
        assert_eq!(image.download_name(), "compressed_cat.jpg");
    }

    #[test]
    fn test_rejects_non_image_media_types() {
        let result = SourceImage::new("notes.txt", "text/plain", vec![1]);
        assert_eq!(
            result.err(),
            Some(DomainError::NotAnImage {
                name: "notes.txt".to_string(),
                media_type: "text/plain".to_string(),
            })
        );
    }

    #[test]
    fn test_picked_file_into_source() {
        let picked = PickedFile {
            name: "a.png".to_string(),
            media_type: "image/png".to_string(),
            data: vec![9; 4],
        };
        let source = picked.into_source().unwrap();
        assert_eq!(source.media_type, "image/png");
        assert_eq!(source.size(), 4);
    }

    #[test]
    fn test_rejects_empty_name() {
        assert!(matches!(
            SourceImage::new("", "image/png", vec![1]),
            Err(DomainError::InvalidInput(_))
        ));
    }
}
