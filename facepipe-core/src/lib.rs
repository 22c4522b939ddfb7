//! Core facepipe primitives.
//!
//! Turns a crowd-sourced face-annotation table into square cropped
//! thumbnails and a typed attributes table, then runs external emotion
//! classifiers over the crops.

/// Typed decoding of annotation rows.
pub mod annotation;
/// Attribute record extraction.
pub mod attributes;
/// Face-region crop, normalize, resize, save.
pub mod cropper;
/// Emotion classifier trait and ONNX model wrappers.
pub mod emotion;
/// Box geometry (square padding).
pub mod geometry;
/// Single-pass pipeline driver.
pub mod pipeline;
/// Batch inference runner.
pub mod runner;

pub use annotation::{AnnotationError, AnnotationRow, RegionTags};
pub use attributes::{AttributeRecord, extract_attributes};
pub use cropper::{CropConfig, crop_region_image};
pub use emotion::{
    EMOTION_LABELS, EmotionClassifier, EmotionPrediction, FerClassifier, ResMaskClassifier,
};
pub use geometry::{Region, pad_to_square};
pub use pipeline::{PipelineConfig, RunSummary, run_pipeline};
pub use runner::{InferenceConfig, InferenceSummary, PredictionRow, run_inference};
