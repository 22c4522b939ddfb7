//! Persistent settings for the facepipe CLI.
//!
//! Settings live in a JSON file and mirror the project's conventional data
//! layout; every value can be overridden per-invocation by a CLI flag.

use std::{fs, path::{Path, PathBuf}};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level settings file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    pub pipeline: PipelineSettings,
    pub inference: InferenceSettings,
}

/// Settings for the `process` subcommand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineSettings {
    pub annotations: PathBuf,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub attributes_out: PathBuf,
    pub crop_size: u32,
    pub jpeg_quality: u8,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            annotations: PathBuf::from("data/annotations/annotations.csv"),
            input_dir: PathBuf::from("data/raw/1"),
            output_dir: PathBuf::from("data/processed/images"),
            attributes_out: PathBuf::from("data/processed/attributes.csv"),
            crop_size: 224,
            jpeg_quality: 90,
        }
    }
}

/// Settings for the `infer` subcommand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InferenceSettings {
    pub attributes: PathBuf,
    pub image_dir: PathBuf,
    pub results_dir: PathBuf,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            attributes: PathBuf::from("data/processed/attributes.csv"),
            image_dir: PathBuf::from("data/processed/images"),
            results_dir: PathBuf::from("results"),
        }
    }
}

impl AppSettings {
    /// Load settings from a JSON file.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse settings {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let settings: AppSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let settings: AppSettings =
            serde_json::from_str(r#"{"pipeline":{"crop_size":96}}"#).unwrap();
        assert_eq!(settings.pipeline.crop_size, 96);
        assert_eq!(
            settings.pipeline.input_dir,
            PipelineSettings::default().input_dir
        );
        assert_eq!(settings.inference, InferenceSettings::default());
    }
}
