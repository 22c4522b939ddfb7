//! Emotion classification over cropped face thumbnails.
//!
//! The classifiers are third-party pre-trained models consumed as black
//! boxes: this module fixes the seven-label vocabulary they share, defines
//! the trait the inference runner works against, and hosts the ONNX-backed
//! wrappers for the two supported model families.

/// FER2013-style CNN wrapper.
pub mod fer;
/// Residual-masking-network wrapper.
pub mod resmask;

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use image::DynamicImage;
use log::debug;
use tract_onnx::prelude::{
    Datum, Framework, Graph, InferenceFact, InferenceModelExt, SimplePlan, TypedFact, TypedOp,
    tvec,
};

pub use fer::FerClassifier;
pub use resmask::ResMaskClassifier;

/// The emotion vocabulary shared by both model families, in logit order.
pub const EMOTION_LABELS: [&str; 7] = [
    "angry", "disgust", "fear", "happy", "sad", "surprise", "neutral",
];

/// One classifier verdict for one face image.
#[derive(Debug, Clone, PartialEq)]
pub struct EmotionPrediction {
    /// Highest-confidence label from [`EMOTION_LABELS`].
    pub label: String,
    /// Confidence of `label`, in [0, 1].
    pub confidence: f32,
    /// Per-label confidence; values sum to ~1.
    pub distribution: BTreeMap<String, f32>,
}

/// A single-image emotion classifier.
///
/// `predict` returns `Ok(None)` when the model declines the image (for
/// classifiers that embed their own face detection and find no face);
/// that policy belongs to the classifier, not to the runner.
pub trait EmotionClassifier {
    /// Short identifier used in log lines and results filenames.
    fn name(&self) -> &str;

    /// Classify one decoded face image.
    fn predict(&self, image: &DynamicImage) -> Result<Option<EmotionPrediction>>;
}

pub(crate) type RunnableModel =
    SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Load and optimize an ONNX graph pinned to a concrete NCHW input shape.
pub(crate) fn load_runnable(path: &Path, input_shape: [usize; 4]) -> Result<RunnableModel> {
    anyhow::ensure!(path.exists(), "model file not found: {}", path.display());

    let model = tract_onnx::onnx()
        .model_for_path(path)
        .with_context(|| format!("failed to parse ONNX graph from {}", path.display()))?
        .with_input_fact(
            0,
            InferenceFact::dt_shape(f32::datum_type(), tvec!(
                input_shape[0],
                input_shape[1],
                input_shape[2],
                input_shape[3]
            )),
        )
        .map_err(|e| anyhow!("unable to pin input shape for {}: {e}", path.display()))?;

    let runnable = model
        .into_optimized()
        .map_err(|e| anyhow!("unable to optimize graph {}: {e}", path.display()))?
        .into_runnable()
        .map_err(|e| anyhow!("unable to make graph {} runnable: {e}", path.display()))?;

    debug!(
        "loaded ONNX model {} with input shape {:?}",
        path.display(),
        input_shape
    );
    Ok(runnable)
}

/// Turn raw model logits into a prediction over [`EMOTION_LABELS`].
pub(crate) fn prediction_from_logits(logits: &[f32]) -> Result<EmotionPrediction> {
    anyhow::ensure!(
        logits.len() == EMOTION_LABELS.len(),
        "expected {} emotion logits, got {}",
        EMOTION_LABELS.len(),
        logits.len()
    );

    let scores = softmax(logits);
    let (best, confidence) = scores
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(idx, score)| (idx, *score))
        .ok_or_else(|| anyhow!("empty score vector"))?;

    let distribution = EMOTION_LABELS
        .iter()
        .zip(scores.iter())
        .map(|(label, score)| (label.to_string(), *score))
        .collect();

    Ok(EmotionPrediction {
        label: EMOTION_LABELS[best].to_string(),
        confidence,
        distribution,
    })
}

/// Numerically stable softmax.
fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|v| v / sum).collect()
}
