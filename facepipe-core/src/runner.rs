//! Batch inference over the cropped thumbnails named in the attributes table.
//!
//! Each run owns one classifier and one results table; two classifiers
//! never share or merge state. Filenames are taken from the attributes
//! table in row order and the results table preserves that order.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use facepipe_utils::{create_csv_writer, load_image, open_csv_reader, timing_guard};

use crate::emotion::EmotionClassifier;

/// Filesystem layout for one inference run.
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// Attributes CSV produced by the pipeline pass.
    pub attributes: PathBuf,
    /// Directory holding the cropped thumbnails.
    pub image_dir: PathBuf,
}

/// One row of a classifier's results table; field order is column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRow {
    pub filename: String,
    pub prediction: String,
    pub prediction_confidence: f32,
    /// Full per-label confidence mapping, JSON-encoded.
    pub full_labels: String,
}

impl PredictionRow {
    /// Column header of the results table; must stay in field order.
    pub const HEADERS: [&'static str; 4] =
        ["filename", "prediction", "prediction_confidence", "full_labels"];
}

/// Counters reported after a completed inference run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InferenceSummary {
    /// Filenames read from the attributes table.
    pub images: usize,
    /// Prediction rows written.
    pub predicted: usize,
    /// Images the classifier declined.
    pub skipped: usize,
}

/// Only the filename column matters here; the other attribute columns are
/// carried by the table but not consumed by inference.
#[derive(Debug, Deserialize)]
struct FilenameColumn {
    filename: String,
}

/// Run `classifier` over every image named in the attributes table and
/// write its results CSV to `results_out`.
///
/// A classifier declining an image (no face found) is logged and skipped;
/// a missing or unreadable crop file aborts the run.
pub fn run_inference(
    classifier: &dyn EmotionClassifier,
    config: &InferenceConfig,
    results_out: &Path,
) -> Result<InferenceSummary> {
    let _guard = timing_guard("facepipe_core::run_inference", log::Level::Debug);

    let mut reader = open_csv_reader(&config.attributes)?;
    let mut rows: Vec<PredictionRow> = Vec::new();
    let mut summary = InferenceSummary::default();

    for record in reader.deserialize::<FilenameColumn>() {
        let record = record.with_context(|| {
            format!(
                "failed to parse attributes row in {}",
                config.attributes.display()
            )
        })?;
        summary.images += 1;

        let image = load_image(config.image_dir.join(&record.filename))?;
        match classifier.predict(&image)? {
            Some(prediction) => {
                debug!(
                    "{}: {} -> {} ({:.3})",
                    classifier.name(),
                    record.filename,
                    prediction.label,
                    prediction.confidence
                );
                rows.push(PredictionRow {
                    filename: record.filename,
                    prediction: prediction.label,
                    prediction_confidence: prediction.confidence,
                    full_labels: serde_json::to_string(&prediction.distribution)?,
                });
                summary.predicted += 1;
            }
            None => {
                warn!(
                    "{} declined {} (no usable face); skipping row",
                    classifier.name(),
                    record.filename
                );
                summary.skipped += 1;
            }
        }
    }

    let mut writer = create_csv_writer(results_out)?;
    // Header goes out even when the classifier declined every image.
    writer.write_record(PredictionRow::HEADERS)?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to write {}", results_out.display()))?;

    Ok(summary)
}
