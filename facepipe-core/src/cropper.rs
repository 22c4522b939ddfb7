//! Face-region extraction: crop, normalize, resize, save.
//!
//! Takes one annotation row, realizes the square-padded crop from the
//! source photo and writes it as a fixed-resolution JPEG thumbnail.

use std::{
    fs,
    fs::File,
    io::BufWriter,
    path::Path,
};

use anyhow::{Context, Result};
use image::{
    DynamicImage, ExtendedColorType, GenericImageView, ImageEncoder, RgbImage, Rgba, RgbaImage,
    codecs::jpeg::JpegEncoder,
    imageops::{self, FilterType},
};
use log::info;

use facepipe_utils::load_image;

use crate::annotation::AnnotationRow;
use crate::geometry::{Region, pad_to_square};

/// Settings controlling crop output.
#[derive(Debug, Clone, Copy)]
pub struct CropConfig {
    /// Output edge length in pixels (crops are always square).
    pub crop_size: u32,
    /// JPEG quality for saved thumbnails (1-100).
    pub jpeg_quality: u8,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            crop_size: 224,
            jpeg_quality: 90,
        }
    }
}

/// Crop the annotated region of `row` and save it as a JPEG thumbnail.
///
/// Returns `Ok(None)` when the row carries no drawn region (`{}` shape),
/// which is common for image-level metadata rows. Otherwise returns the
/// derived output filename after writing
/// `<output_base>/<stem>_<region_id>.<suffix>`.
///
/// The padded box is never clamped to the image: areas outside the source
/// are filled with opaque black before resizing. A missing source image is
/// an error and aborts the caller's run.
pub fn crop_region_image(
    row: &AnnotationRow,
    input_base: &Path,
    output_base: &Path,
    config: &CropConfig,
) -> Result<Option<String>> {
    let Some(region) = row.region_shape()? else {
        return Ok(None);
    };
    let region = pad_to_square(region);

    let source_path = input_base.join(&row.filename);
    let image = load_image(&source_path)?;

    let crop = realize_crop(&image, region);
    let resized = imageops::resize(&crop, config.crop_size, config.crop_size, FilterType::Triangle);

    let name = row.derived_filename();
    let destination = output_base.join(&name);
    if let Some(parent) = destination.parent().filter(|p| !p.exists()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let file = File::create(&destination)
        .with_context(|| format!("failed to create {}", destination.display()))?;
    let writer = BufWriter::new(file);
    JpegEncoder::new_with_quality(writer, config.jpeg_quality)
        .write_image(
            resized.as_raw(),
            resized.width(),
            resized.height(),
            ExtendedColorType::Rgb8,
        )
        .with_context(|| format!("failed to encode JPEG {}", destination.display()))?;

    info!("Saved image crop: {name}");
    Ok(Some(name))
}

/// Realize `region` against `image` as a three-channel buffer.
///
/// Alpha and palette sources collapse to RGB here; the canvas is sized to
/// the (possibly out-of-bounds) region and black-filled before the
/// in-bounds sub-rectangle is copied in.
fn realize_crop(image: &DynamicImage, region: Region) -> RgbImage {
    let (img_w, img_h) = image.dimensions();
    let canvas_w = region.width.max(1) as u32;
    let canvas_h = region.height.max(1) as u32;
    let mut canvas = RgbaImage::from_pixel(canvas_w, canvas_h, Rgba([0, 0, 0, 255]));

    let src_x = region.x.clamp(0, img_w as i64);
    let src_y = region.y.clamp(0, img_h as i64);
    let end_x = (region.x + region.width).clamp(0, img_w as i64);
    let end_y = (region.y + region.height).clamp(0, img_h as i64);

    if end_x > src_x && end_y > src_y {
        let sub = imageops::crop_imm(
            image,
            src_x as u32,
            src_y as u32,
            (end_x - src_x) as u32,
            (end_y - src_y) as u32,
        )
        .to_image();
        imageops::replace(&mut canvas, &sub, src_x - region.x, src_y - region.y);
    }

    DynamicImage::ImageRgba8(canvas).to_rgb8()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use tempfile::tempdir;

    fn row(filename: &str, region_id: u32, shape: &str) -> AnnotationRow {
        AnnotationRow {
            filename: filename.to_string(),
            region_id,
            region_shape_attributes: shape.to_string(),
            region_attributes: "{}".to_string(),
        }
    }

    fn write_solid_image(path: &Path, width: u32, height: u32, color: Rgb<u8>) {
        image::RgbImage::from_pixel(width, height, color)
            .save(path)
            .unwrap();
    }

    #[test]
    fn empty_shape_produces_no_file() {
        let td = tempdir().unwrap();
        let out = td.path().join("crops");
        let result = crop_region_image(
            &row("x.png", 0, "{}"),
            td.path(),
            &out,
            &CropConfig::default(),
        )
        .unwrap();
        assert!(result.is_none());
        assert!(!out.exists());
    }

    #[test]
    fn crop_writes_resized_thumbnail_under_derived_name() {
        let td = tempdir().unwrap();
        write_solid_image(&td.path().join("face.png"), 300, 300, Rgb([90, 140, 190]));
        let out = td.path().join("crops");

        let name = crop_region_image(
            &row(
                "face.png",
                2,
                r#"{"name":"rect","x":50,"y":60,"width":100,"height":80}"#,
            ),
            td.path(),
            &out,
            &CropConfig::default(),
        )
        .unwrap()
        .expect("crop produced");

        assert_eq!(name, "face_2.png");
        let saved = load_image(out.join(&name)).unwrap();
        assert_eq!(saved.dimensions(), (224, 224));
    }

    #[test]
    fn out_of_bounds_region_is_black_filled() {
        let td = tempdir().unwrap();
        write_solid_image(&td.path().join("edge.png"), 60, 60, Rgb([255, 255, 255]));
        let out = td.path().join("crops");

        // Wide box near the top; padding pushes y negative.
        let name = crop_region_image(
            &row(
                "edge.png",
                0,
                r#"{"name":"rect","x":0,"y":0,"width":60,"height":20}"#,
            ),
            td.path(),
            &out,
            &CropConfig {
                crop_size: 60,
                jpeg_quality: 95,
            },
        )
        .unwrap()
        .expect("crop produced");

        let saved = load_image(out.join(&name)).unwrap().to_rgb8();
        let top = saved.get_pixel(30, 1);
        let middle = saved.get_pixel(30, 30);
        // Above the source image: fill. Inside: white source pixels.
        assert!(top[0] < 60 && top[1] < 60 && top[2] < 60);
        assert!(middle[0] > 200 && middle[1] > 200 && middle[2] > 200);
    }

    #[test]
    fn missing_source_image_is_fatal() {
        let td = tempdir().unwrap();
        let err = crop_region_image(
            &row(
                "gone.png",
                0,
                r#"{"name":"rect","x":0,"y":0,"width":10,"height":10}"#,
            ),
            td.path(),
            td.path(),
            &CropConfig::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("gone.png"));
    }

    #[test]
    fn alpha_source_collapses_to_rgb() {
        let td = tempdir().unwrap();
        let rgba = RgbaImage::from_pixel(40, 40, Rgba([10, 200, 30, 128]));
        rgba.save(td.path().join("ghost.png")).unwrap();
        let out = td.path().join("crops");

        let name = crop_region_image(
            &row(
                "ghost.png",
                1,
                r#"{"name":"rect","x":5,"y":5,"width":20,"height":20}"#,
            ),
            td.path(),
            &out,
            &CropConfig::default(),
        )
        .unwrap()
        .expect("crop produced");

        let saved = load_image(out.join(&name)).unwrap();
        assert_eq!(saved.color().channel_count(), 3);
    }
}
