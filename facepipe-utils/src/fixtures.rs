//! Synthetic fixture builders used by unit and integration tests.
//!
//! Every test input in this project (annotation tables, source photos) is
//! small enough to generate on the fly, so tests synthesize fixtures into
//! temporary directories instead of loading committed binary assets.

use std::path::Path;

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};

use crate::table::create_csv_writer;

/// One row of a synthetic annotation table.
///
/// The shape and tag fields hold JSON-encoded text exactly as a crowd-source
/// export would: `{}` for rows without a drawn region or without tags.
#[derive(Debug, Clone)]
pub struct AnnotationFixture {
    pub filename: String,
    pub region_id: u32,
    pub shape: String,
    pub tags: String,
}

impl AnnotationFixture {
    pub fn new(
        filename: impl Into<String>,
        region_id: u32,
        shape: impl Into<String>,
        tags: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            region_id,
            shape: shape.into(),
            tags: tags.into(),
        }
    }
}

/// Write an annotation CSV in the crowd-source export layout.
///
/// Includes a `file_size` column that the pipeline must ignore.
pub fn write_annotations_csv(path: &Path, rows: &[AnnotationFixture]) -> Result<()> {
    let mut writer = create_csv_writer(path)?;
    writer.write_record([
        "filename",
        "file_size",
        "region_id",
        "region_shape_attributes",
        "region_attributes",
    ])?;
    for row in rows {
        writer.write_record([
            row.filename.as_str(),
            "12345",
            &row.region_id.to_string(),
            row.shape.as_str(),
            row.tags.as_str(),
        ])?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;
    Ok(())
}

/// Build a horizontal/vertical gradient image so crops taken from different
/// positions have distinguishable pixel content.
pub fn gradient_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width.max(1)) as u8;
        let g = (y * 255 / height.max(1)) as u8;
        Rgb([r, g, 128])
    })
}

/// Save a gradient image to `path`, creating parent directories as needed.
pub fn save_gradient_image(path: &Path, width: u32, height: u32) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty() && !p.exists()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    gradient_image(width, height)
        .save(path)
        .with_context(|| format!("failed to save fixture image {}", path.display()))
}
