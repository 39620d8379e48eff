use std::path::{Path, PathBuf};

use image::ImageFormat;
use tokio::fs;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::info;

use super::error::InfrastructureError;
use crate::domain::source_image::PickedFile;

const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

/// Declared media type based on the file extension, the way a file picker reports it.
pub fn media_type_for(path: &Path) -> String {
    let media_type = match ImageFormat::from_path(path) {
        Ok(ImageFormat::Jpeg) => "image/jpeg",
        Ok(ImageFormat::Png) => "image/png",
        Ok(ImageFormat::Gif) => "image/gif",
        Ok(ImageFormat::WebP) => "image/webp",
        Ok(ImageFormat::Bmp) => "image/bmp",
        Ok(ImageFormat::Tiff) => "image/tiff",
        Ok(ImageFormat::Ico) => "image/x-icon",
        Ok(ImageFormat::Avif) => "image/avif",
        Ok(ImageFormat::Pnm) => "image/x-portable-anymap",
        Ok(ImageFormat::Tga) => "image/x-tga",
        Ok(_) => "image/x-unknown",
        Err(_) => UNKNOWN_MEDIA_TYPE,
    };
    media_type.to_string()
}

pub struct LocalFileStorage {
    output_dir: PathBuf,
}

impl LocalFileStorage {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub async fn pick_file(&self, path: &Path) -> Result<PickedFile, InfrastructureError> {
        let data = fs::read(path).await.map_err(InfrastructureError::IoError)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(PickedFile {
            name,
            media_type: media_type_for(path),
            data,
        })
    }

    pub async fn save_download(&self, file_name: &str, data: &[u8]) -> Result<PathBuf, InfrastructureError> {
        fs::create_dir_all(&self.output_dir).await.map_err(InfrastructureError::IoError)?;
        let path = self.output_dir.join(file_name);
        let mut file = File::create(&path).await.map_err(InfrastructureError::IoError)?;
        file.write_all(data).await.map_err(InfrastructureError::IoError)?;
        file.flush().await.map_err(InfrastructureError::IoError)?;
        info!("Saved {} ({} bytes)", path.display(), data.len());
        Ok(path)
    }
}
