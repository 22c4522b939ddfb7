//! Command-line argument definitions for facepipe.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Crop annotated face regions and run emotion models over the results.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional settings JSON (defaults to built-in paths).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Crop annotated regions into thumbnails and write the attributes table.
    Process(ProcessArgs),
    /// Run an emotion classifier over previously cropped thumbnails.
    Infer(InferArgs),
}

#[derive(Debug, clap::Args)]
pub struct ProcessArgs {
    /// Annotation CSV to read.
    #[arg(long)]
    pub annotations: Option<PathBuf>,

    /// Base directory holding the raw source images.
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Directory receiving cropped thumbnails.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Destination of the attributes CSV.
    #[arg(long)]
    pub attributes_out: Option<PathBuf>,

    /// Output edge length for crops (pixels).
    #[arg(long)]
    pub crop_size: Option<u32>,

    /// JPEG quality for saved crops (1-100).
    #[arg(long)]
    pub jpeg_quality: Option<u8>,
}

#[derive(Debug, clap::Args)]
pub struct InferArgs {
    /// Which model family the weights belong to.
    #[arg(long, value_enum)]
    pub model: ModelKind,

    /// Path to the classifier's ONNX weights.
    #[arg(long)]
    pub weights: PathBuf,

    /// Attributes CSV naming the crops to classify.
    #[arg(long)]
    pub attributes: Option<PathBuf>,

    /// Directory holding the cropped thumbnails.
    #[arg(long)]
    pub image_dir: Option<PathBuf>,

    /// Directory receiving the results CSV (named `<model>_results.csv`).
    #[arg(long)]
    pub results_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelKind {
    /// FER2013-style CNN (grayscale 48x48 input).
    Fer,
    /// Residual masking network (RGB 224x224 input).
    Resmask,
}
