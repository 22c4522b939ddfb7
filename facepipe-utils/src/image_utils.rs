//! Image loading helpers.

use std::path::Path;

use anyhow::{Context, Result};
use image::{DynamicImage, ImageReader};

/// Load an image from disk, detecting the format from file content.
///
/// Crop thumbnails keep the source image's suffix but are always
/// JPEG-encoded, so the extension cannot be trusted here.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let path_ref = path.as_ref();
    ImageReader::open(path_ref)
        .with_context(|| format!("failed to open image {}", path_ref.display()))?
        .with_guessed_format()
        .with_context(|| format!("failed to probe image format of {}", path_ref.display()))?
        .decode()
        .with_context(|| format!("failed to decode image {}", path_ref.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ExtendedColorType, ImageEncoder, codecs::jpeg::JpegEncoder};

    #[test]
    fn loads_jpeg_content_behind_png_extension() {
        let td = tempfile::tempdir().unwrap();
        let path = td.path().join("mislabeled.png");
        let rgb = image::RgbImage::from_pixel(8, 8, image::Rgb([1, 2, 3]));
        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, 90)
            .write_image(rgb.as_raw(), 8, 8, ExtendedColorType::Rgb8)
            .unwrap();
        std::fs::write(&path, bytes).unwrap();

        let loaded = load_image(&path).expect("content sniffing should win");
        assert_eq!(loaded.width(), 8);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_image("nope/missing.jpg").unwrap_err();
        assert!(err.to_string().contains("missing.jpg"));
    }
}
