//! Single-pass pipeline driver.
//!
//! Reads the annotation table once in row order, invoking the attribute
//! extractor and the face cropper independently for every row, then writes
//! the accumulated attribute records to one CSV. There is no partial-output
//! recovery: a failure mid-pass produces no attributes table at all.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};

use facepipe_utils::{create_csv_writer, open_csv_reader, timing_guard};

use crate::annotation::AnnotationRow;
use crate::attributes::{AttributeRecord, extract_attributes};
use crate::cropper::{CropConfig, crop_region_image};

/// Filesystem layout and crop settings for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Annotation CSV to read.
    pub annotations: PathBuf,
    /// Base directory holding the raw source images.
    pub input_dir: PathBuf,
    /// Directory receiving cropped thumbnails.
    pub output_dir: PathBuf,
    pub crop: CropConfig,
}

/// Counters reported after a completed pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Annotation rows read.
    pub rows: usize,
    /// Crop files written.
    pub crops: usize,
    /// Attribute records written.
    pub records: usize,
}

/// Run the full annotation-to-crop pass and write `attributes_out`.
///
/// Row order is preserved: the attributes table lists records in the order
/// their rows appear in the annotation CSV. The extractor's and cropper's
/// skip conditions are independent (empty tags vs. empty shape), so a row
/// may produce a crop without a record or vice versa.
pub fn run_pipeline(config: &PipelineConfig, attributes_out: &Path) -> Result<RunSummary> {
    let _guard = timing_guard("facepipe_core::run_pipeline", log::Level::Debug);

    let mut reader = open_csv_reader(&config.annotations)?;
    let mut records: Vec<AttributeRecord> = Vec::new();
    let mut summary = RunSummary::default();

    for row in reader.deserialize::<AnnotationRow>() {
        let row = row.with_context(|| {
            format!(
                "failed to parse annotation row in {}",
                config.annotations.display()
            )
        })?;
        summary.rows += 1;
        debug!("processing {} region {}", row.filename, row.region_id);

        if let Some(record) = extract_attributes(&row)? {
            records.push(record);
            summary.records += 1;
        }

        if crop_region_image(&row, &config.input_dir, &config.output_dir, &config.crop)?.is_some() {
            summary.crops += 1;
        }
    }

    let mut writer = create_csv_writer(attributes_out)?;
    // Header goes out even when every row was skipped.
    writer.write_record(AttributeRecord::HEADERS)?;
    for record in &records {
        writer.serialize(record)?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to write {}", attributes_out.display()))?;

    info!(
        "Processed {} row(s): {} crop(s), {} attribute record(s)",
        summary.rows, summary.crops, summary.records
    );
    Ok(summary)
}
