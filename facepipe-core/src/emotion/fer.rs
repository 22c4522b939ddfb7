//! FER2013-style emotion CNN.
//!
//! These models take a single grayscale 48x48 face, pixel values scaled to
//! [0, 1], laid out NCHW, and emit seven logits in vocabulary order.

use std::path::Path;

use anyhow::{Result, anyhow};
use image::{DynamicImage, imageops::FilterType};
use tract_onnx::prelude::{IntoTensor, Tensor, tvec};

use super::{EmotionClassifier, EmotionPrediction, RunnableModel, load_runnable,
    prediction_from_logits};

const INPUT_SIZE: u32 = 48;

/// Wrapper around a FER2013-family ONNX model.
pub struct FerClassifier {
    runnable: RunnableModel,
}

impl FerClassifier {
    /// Load the model weights from an `.onnx` file.
    pub fn load<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let runnable = load_runnable(
            model_path.as_ref(),
            [1, 1, INPUT_SIZE as usize, INPUT_SIZE as usize],
        )?;
        Ok(Self { runnable })
    }

    fn to_tensor(&self, image: &DynamicImage) -> Result<Tensor> {
        let gray = image
            .resize_exact(INPUT_SIZE, INPUT_SIZE, FilterType::Triangle)
            .to_luma8();
        let floats: Vec<f32> = gray.as_raw().iter().map(|&p| p as f32 / 255.0).collect();
        Tensor::from_shape(
            &[1, 1, INPUT_SIZE as usize, INPUT_SIZE as usize],
            &floats,
        )
        .map_err(|e| anyhow!("failed to build FER input tensor: {e}"))
    }
}

impl EmotionClassifier for FerClassifier {
    fn name(&self) -> &str {
        "fer"
    }

    fn predict(&self, image: &DynamicImage) -> Result<Option<EmotionPrediction>> {
        let tensor = self.to_tensor(image)?;
        let outputs = self
            .runnable
            .run(tvec!(tensor.into()))
            .map_err(|e| anyhow!("FER execution failed: {e}"))?;
        let output = outputs
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("FER model produced no outputs"))?
            .into_tensor();
        let logits = output
            .as_slice::<f32>()
            .map_err(|e| anyhow!("unexpected FER output tensor: {e}"))?;
        prediction_from_logits(logits).map(Some)
    }
}
