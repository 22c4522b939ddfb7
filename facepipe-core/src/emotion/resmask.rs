//! Residual-masking-network emotion model.
//!
//! These models take a single RGB 224x224 face with ImageNet mean/std
//! normalization, laid out NCHW, and emit seven logits in vocabulary order.

use std::path::Path;

use anyhow::{Result, anyhow};
use image::{DynamicImage, imageops::FilterType};
use tract_onnx::prelude::{IntoTensor, Tensor, tvec};

use super::{EmotionClassifier, EmotionPrediction, RunnableModel, load_runnable,
    prediction_from_logits};

const INPUT_SIZE: u32 = 224;
const MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Wrapper around a residual-masking-network ONNX model.
pub struct ResMaskClassifier {
    runnable: RunnableModel,
}

impl ResMaskClassifier {
    /// Load the model weights from an `.onnx` file.
    pub fn load<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let runnable = load_runnable(
            model_path.as_ref(),
            [1, 3, INPUT_SIZE as usize, INPUT_SIZE as usize],
        )?;
        Ok(Self { runnable })
    }

    fn to_tensor(&self, image: &DynamicImage) -> Result<Tensor> {
        let rgb = image
            .resize_exact(INPUT_SIZE, INPUT_SIZE, FilterType::Triangle)
            .to_rgb8();
        let size = INPUT_SIZE as usize;
        let mut floats = vec![0.0f32; 3 * size * size];
        for (x, y, pixel) in rgb.enumerate_pixels() {
            let (xi, yi) = (x as usize, y as usize);
            for channel in 0..3 {
                let value = pixel[channel] as f32 / 255.0;
                floats[channel * size * size + yi * size + xi] =
                    (value - MEAN[channel]) / STD[channel];
            }
        }
        Tensor::from_shape(&[1, 3, size, size], &floats)
            .map_err(|e| anyhow!("failed to build ResMask input tensor: {e}"))
    }
}

impl EmotionClassifier for ResMaskClassifier {
    fn name(&self) -> &str {
        "resmask"
    }

    fn predict(&self, image: &DynamicImage) -> Result<Option<EmotionPrediction>> {
        let tensor = self.to_tensor(image)?;
        let outputs = self
            .runnable
            .run(tvec!(tensor.into()))
            .map_err(|e| anyhow!("ResMask execution failed: {e}"))?;
        let output = outputs
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("ResMask model produced no outputs"))?
            .into_tensor();
        let logits = output
            .as_slice::<f32>()
            .map_err(|e| anyhow!("unexpected ResMask output tensor: {e}"))?;
        prediction_from_logits(logits).map(Some)
    }
}
