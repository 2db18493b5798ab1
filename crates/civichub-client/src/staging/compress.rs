//! Image downscaling before upload.

use std::io::Cursor;

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};

use civichub_core::config::StagingConfig;
use civichub_core::error::AppError;
use civichub_core::result::AppResult;

use super::StagedFile;

const PNG: &str = "image/png";
const JPEG: &str = "image/jpeg";

/// Shrinks oversized images so their longest edge fits `max_dimension`.
///
/// PNG input stays PNG; every other image type is re-encoded as JPEG at the
/// configured quality. Non-image files and images already within bounds
/// pass through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Downscaler {
    max_dimension: u32,
    quality: u8,
}

impl Default for Downscaler {
    fn default() -> Self {
        Self::from_config(&StagingConfig::default())
    }
}

impl Downscaler {
    /// Create a downscaler. `quality` is clamped to 1..=100.
    pub fn new(max_dimension: u32, quality: u8) -> Self {
        Self {
            max_dimension: max_dimension.max(1),
            quality: quality.clamp(1, 100),
        }
    }

    /// Create a downscaler from staging settings.
    pub fn from_config(config: &StagingConfig) -> Self {
        Self::new(config.max_dimension, config.quality)
    }

    /// Downscale on the blocking pool.
    ///
    /// Returns an error when an image cannot be decoded or re-encoded; the
    /// caller decides whether to fall back to the original.
    pub async fn downscale(&self, file: StagedFile) -> AppResult<StagedFile> {
        if !file.is_image() {
            return Ok(file);
        }
        let this = *self;
        tokio::task::spawn_blocking(move || this.downscale_blocking(file))
            .await
            .map_err(|e| AppError::internal(format!("Image task failed: {e}")))?
    }

    /// Synchronous variant of [`downscale`](Self::downscale).
    pub fn downscale_blocking(&self, file: StagedFile) -> AppResult<StagedFile> {
        if !file.is_image() {
            return Ok(file);
        }

        let img = image::load_from_memory(&file.bytes)
            .map_err(|e| AppError::internal(format!("Failed to decode image: {e}")))?;
        let (width, height) = (img.width(), img.height());
        if width <= self.max_dimension && height <= self.max_dimension {
            return Ok(file);
        }

        let (target_w, target_h) = fit_within(width, height, self.max_dimension);
        let resized = img.resize_exact(target_w, target_h, FilterType::Lanczos3);

        let (content_type, bytes) = if file.content_type == PNG {
            (PNG, encode_png(&resized)?)
        } else {
            (JPEG, encode_jpeg(&resized, self.quality)?)
        };

        tracing::debug!(
            name = %file.name,
            from = ?(width, height),
            to = ?(target_w, target_h),
            before = file.len(),
            after = bytes.len(),
            "Downscaled image"
        );

        Ok(StagedFile {
            name: file.name,
            content_type: content_type.to_string(),
            bytes: Bytes::from(bytes),
        })
    }
}

/// Scale `(width, height)` so the longest edge equals `max`, keeping the
/// aspect ratio.
fn fit_within(width: u32, height: u32, max: u32) -> (u32, u32) {
    let scale = |edge: u32, long: u32| -> u32 {
        ((f64::from(edge) * f64::from(max) / f64::from(long)).round() as u32).max(1)
    };
    if width >= height {
        (max, scale(height, width))
    } else {
        (scale(width, height), max)
    }
}

fn encode_png(img: &DynamicImage) -> AppResult<Vec<u8>> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| AppError::internal(format!("Failed to encode PNG: {e}")))?;
    Ok(buf)
}

fn encode_jpeg(img: &DynamicImage, quality: u8) -> AppResult<Vec<u8>> {
    let mut buf = Vec::new();
    let rgb = img.to_rgb8();
    JpegEncoder::new_with_quality(&mut buf, quality)
        .encode_image(&rgb)
        .map_err(|e| AppError::internal(format!("Failed to encode JPEG: {e}")))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, RgbImage};

    fn png(width: u32, height: u32) -> StagedFile {
        let img = DynamicImage::ImageRgb8(RgbImage::new(width, height));
        StagedFile::new("photo.png", PNG, encode_png(&img).unwrap())
    }

    #[test]
    fn test_fit_within() {
        assert_eq!(fit_within(4000, 2000, 1920), (1920, 960));
        assert_eq!(fit_within(1000, 3000, 1920), (640, 1920));
        assert_eq!(fit_within(5000, 1, 1920), (1920, 1));
    }

    #[test]
    fn test_oversized_png_stays_png() {
        let out = Downscaler::new(100, 80).downscale_blocking(png(400, 200)).unwrap();
        assert_eq!(out.content_type, PNG);
        let img = image::load_from_memory(&out.bytes).unwrap();
        assert_eq!(img.dimensions(), (100, 50));
    }

    #[test]
    fn test_other_images_become_jpeg() {
        let mut file = png(300, 600);
        file.content_type = "image/webp".into();
        let out = Downscaler::new(100, 80).downscale_blocking(file).unwrap();
        assert_eq!(out.content_type, JPEG);
        let img = image::load_from_memory(&out.bytes).unwrap();
        assert_eq!(img.dimensions(), (50, 100));
    }

    #[test]
    fn test_small_image_is_untouched() {
        let file = png(50, 50);
        let out = Downscaler::new(100, 80).downscale_blocking(file.clone()).unwrap();
        assert_eq!(out, file);
    }

    #[test]
    fn test_non_image_passes_through() {
        let file = StagedFile::new("notes.pdf", "application/pdf", &b"%PDF-1.7"[..]);
        let out = Downscaler::default().downscale_blocking(file.clone()).unwrap();
        assert_eq!(out, file);
    }

    #[test]
    fn test_corrupt_image_is_an_error() {
        let file = StagedFile::new("broken.jpg", JPEG, &b"not a jpeg"[..]);
        assert!(Downscaler::default().downscale_blocking(file).is_err());
    }
}
