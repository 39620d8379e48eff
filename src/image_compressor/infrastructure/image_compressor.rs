use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, GenericImageView, ImageFormat};
use tracing::debug;

use super::error::InfrastructureError;
use crate::domain::compression_options::CompressionOptions;
use crate::domain::compressor_trait::ImageCompressor;

const REFINEMENT_FACTOR: f32 = 0.95;

/// Native backend: decode, fit to the long-edge limit, re-encode.
/// PNG stays PNG, everything else leaves as JPEG, whatever the file name
/// says (see [`SourceImage::download_name`](crate::domain::source_image::SourceImage::download_name)).
pub struct DefaultImageCompressor;

impl DefaultImageCompressor {
    pub fn new() -> Self {
        Self
    }

    fn decode(&self, image_bytes: &[u8]) -> Result<(DynamicImage, Option<ImageFormat>), InfrastructureError> {
        let reader = image::io::Reader::new(Cursor::new(image_bytes))
            .with_guessed_format()
            .map_err(InfrastructureError::IoError)?;
        let format = reader.format();
        let img = reader.decode().map_err(InfrastructureError::ImageLibError)?;
        Ok((img, format))
    }

    fn fit_within(&self, img: DynamicImage, max_edge: u32) -> DynamicImage {
        let (width, height) = img.dimensions();
        if max_edge == 0 || width.max(height) <= max_edge {
            return img;
        }
        debug!("Downscaling {}x{} to fit {}px", width, height, max_edge);
        img.resize(max_edge, max_edge, FilterType::Lanczos3)
    }

    fn shrink(&self, img: DynamicImage) -> DynamicImage {
        let (width, height) = img.dimensions();
        let new_width = ((width as f32 * REFINEMENT_FACTOR) as u32).max(1);
        let new_height = ((height as f32 * REFINEMENT_FACTOR) as u32).max(1);
        img.resize_exact(new_width, new_height, FilterType::Triangle)
    }

    fn encode(
        &self,
        img: &DynamicImage,
        output_format: ImageFormat,
        quality: f32,
    ) -> Result<Vec<u8>, InfrastructureError> {
        let mut buffer = Cursor::new(Vec::new());
        match output_format {
            ImageFormat::Png => {
                img.write_to(&mut buffer, ImageFormat::Png)
                    .map_err(InfrastructureError::ImageLibError)?;
            }
            _ => {
                let rgb = img.to_rgb8();
                let mut encoder = JpegEncoder::new_with_quality(&mut buffer, jpeg_quality(quality));
                encoder
                    .encode(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8)
                    .map_err(InfrastructureError::ImageLibError)?;
            }
        }
        Ok(buffer.into_inner())
    }
}

impl Default for DefaultImageCompressor {
    fn default() -> Self {
        Self::new()
    }
}

fn jpeg_quality(quality: f32) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

impl ImageCompressor for DefaultImageCompressor {
    fn compress(
        &self,
        image_bytes: &[u8],
        options: &CompressionOptions,
    ) -> Result<Vec<u8>, InfrastructureError> {
        let (img, input_format) = self.decode(image_bytes)?;
        // only PNG keeps its container, lossy re-encoding needs quality control
        let output_format = match input_format {
            Some(ImageFormat::Png) => ImageFormat::Png,
            _ => ImageFormat::Jpeg,
        };

        let mut img = if options.always_keep_resolution {
            img
        } else {
            self.fit_within(img, options.max_width_or_height)
        };

        let ceiling = options.max_size_bytes();
        let mut quality = options.initial_quality;
        let mut best = self.encode(&img, output_format, quality)?;
        let mut passes = 1;

        while best.len() as u64 > ceiling && passes < options.max_iteration {
            quality *= REFINEMENT_FACTOR;
            if !options.always_keep_resolution {
                img = self.shrink(img);
            }
            let candidate = self.encode(&img, output_format, quality)?;
            passes += 1;
            debug!(
                "Refinement pass {}: {} -> {} bytes (ceiling {})",
                passes,
                best.len(),
                candidate.len(),
                ceiling
            );
            if candidate.len() < best.len() {
                best = candidate;
            }
        }

        if best.is_empty() {
            return Err(InfrastructureError::CompressionFailed(
                "encoder produced no data".to_string(),
            ));
        }
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::source_image::SourceImage;
    use image::{Rgb, RgbImage};

    fn noisy_image(width: u32, height: u32) -> DynamicImage {
        let img = RgbImage::from_fn(width, height, |x, y| {
            let v = (x.wrapping_mul(31) ^ y.wrapping_mul(17)) as u8;
            Rgb([v, v.wrapping_add(60), v.wrapping_mul(3)])
        });
        DynamicImage::ImageRgb8(img)
    }

    fn encoded(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        match format {
            ImageFormat::Jpeg => {
                let rgb = img.to_rgb8();
                JpegEncoder::new_with_quality(&mut buffer, 100)
                    .encode(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8)
                    .unwrap();
            }
            other => img.write_to(&mut buffer, other).unwrap(),
        }
        buffer.into_inner()
    }

    fn options_for(bytes: &[u8], quality: f32) -> CompressionOptions {
        let source = SourceImage::new("test", "image/jpeg", bytes.to_vec()).unwrap();
        CompressionOptions::for_source(&source, quality)
    }

    #[test]
    fn test_jpeg_is_downscaled_to_long_edge() {
        let input = encoded(&noisy_image(2400, 1200), ImageFormat::Jpeg);
        let options = options_for(&input, 0.8);
        let output = DefaultImageCompressor::new().compress(&input, &options).unwrap();

        assert_eq!(image::guess_format(&output).unwrap(), ImageFormat::Jpeg);
        let decoded = image::load_from_memory(&output).unwrap();
        assert!(decoded.width().max(decoded.height()) <= 1920);
        assert!(output.len() < input.len());
    }

    #[test]
    fn test_keep_resolution_leaves_dimensions() {
        let input = encoded(&noisy_image(2400, 100), ImageFormat::Jpeg);
        let mut options = options_for(&input, 0.6);
        options.always_keep_resolution = true;
        let output = DefaultImageCompressor::new().compress(&input, &options).unwrap();

        let decoded = image::load_from_memory(&output).unwrap();
        assert_eq!(decoded.dimensions(), (2400, 100));
    }

    #[test]
    fn test_png_stays_png() {
        let input = encoded(&noisy_image(64, 48), ImageFormat::Png);
        let options = options_for(&input, 0.8);
        let output = DefaultImageCompressor::new().compress(&input, &options).unwrap();

        assert_eq!(image::guess_format(&output).unwrap(), ImageFormat::Png);
        assert_eq!(image::load_from_memory(&output).unwrap().dimensions(), (64, 48));
    }

    #[test]
    fn test_gif_input_is_written_as_jpeg_under_its_original_name() {
        let rgba = DynamicImage::ImageRgba8(noisy_image(40, 30).to_rgba8());
        let input = encoded(&rgba, ImageFormat::Gif);
        assert_eq!(image::guess_format(&input).unwrap(), ImageFormat::Gif);

        let source = SourceImage::new("cat.gif", "image/gif", input.clone()).unwrap();
        let options = CompressionOptions::for_source(&source, 0.8);
        let output = DefaultImageCompressor::new().compress(&input, &options).unwrap();

        assert_eq!(image::guess_format(&output).unwrap(), ImageFormat::Jpeg);
        assert_eq!(source.download_name(), "compressed_cat.gif");
    }

    #[test]
    fn test_small_images_are_not_upscaled() {
        let input = encoded(&noisy_image(40, 30), ImageFormat::Jpeg);
        let options = options_for(&input, 0.8);
        let output = DefaultImageCompressor::new().compress(&input, &options).unwrap();
        assert_eq!(image::load_from_memory(&output).unwrap().dimensions(), (40, 30));
    }

    #[test]
    fn test_invalid_image_data() {
        let options = options_for(&[1, 2, 3, 4], 0.8);
        let result = DefaultImageCompressor::new().compress(&[1, 2, 3, 4], &options);
        match result {
            Err(InfrastructureError::ImageLibError(_)) | Err(InfrastructureError::IoError(_)) => {}
            other => panic!("Expected ImageLibError or IoError, got {:?}", other),
        }
    }

    #[test]
    fn test_jpeg_quality_mapping() {
        assert_eq!(jpeg_quality(0.8), 80);
        assert_eq!(jpeg_quality(0.0), 1);
        assert_eq!(jpeg_quality(1.5), 100);
    }
}
