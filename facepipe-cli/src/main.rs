mod args;
mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;

use facepipe_core::{
    CropConfig, EmotionClassifier, FerClassifier, InferenceConfig, PipelineConfig,
    ResMaskClassifier, run_inference, run_pipeline,
};
use facepipe_utils::init_logging;

use crate::args::{Cli, Command, InferArgs, ModelKind, ProcessArgs};
use crate::config::AppSettings;

fn main() -> Result<()> {
    init_logging(log::LevelFilter::Info)?;
    let cli = Cli::parse();

    let settings = match cli.config.as_deref() {
        Some(path) => AppSettings::load_from_path(path)?,
        None => AppSettings::default(),
    };

    match cli.command {
        Command::Process(args) => run_process(settings, args),
        Command::Infer(args) => run_infer(settings, args),
    }
}

fn run_process(settings: AppSettings, args: ProcessArgs) -> Result<()> {
    let mut pipeline = settings.pipeline;
    if let Some(annotations) = args.annotations {
        pipeline.annotations = annotations;
    }
    if let Some(input_dir) = args.input_dir {
        pipeline.input_dir = input_dir;
    }
    if let Some(output_dir) = args.output_dir {
        pipeline.output_dir = output_dir;
    }
    if let Some(attributes_out) = args.attributes_out {
        pipeline.attributes_out = attributes_out;
    }
    if let Some(crop_size) = args.crop_size {
        pipeline.crop_size = crop_size;
    }
    if let Some(jpeg_quality) = args.jpeg_quality {
        pipeline.jpeg_quality = jpeg_quality;
    }

    info!(
        "Processing annotations {} into {}",
        pipeline.annotations.display(),
        pipeline.output_dir.display()
    );
    let config = PipelineConfig {
        annotations: pipeline.annotations,
        input_dir: pipeline.input_dir,
        output_dir: pipeline.output_dir,
        crop: CropConfig {
            crop_size: pipeline.crop_size,
            jpeg_quality: pipeline.jpeg_quality,
        },
    };
    let summary = run_pipeline(&config, &pipeline.attributes_out)?;
    info!(
        "Wrote {} attribute record(s) to {}",
        summary.records,
        pipeline.attributes_out.display()
    );
    Ok(())
}

fn run_infer(settings: AppSettings, args: InferArgs) -> Result<()> {
    let mut inference = settings.inference;
    if let Some(attributes) = args.attributes {
        inference.attributes = attributes;
    }
    if let Some(image_dir) = args.image_dir {
        inference.image_dir = image_dir;
    }
    if let Some(results_dir) = args.results_dir {
        inference.results_dir = results_dir;
    }

    let classifier: Box<dyn EmotionClassifier> = match args.model {
        ModelKind::Fer => Box::new(FerClassifier::load(&args.weights)?),
        ModelKind::Resmask => Box::new(ResMaskClassifier::load(&args.weights)?),
    };

    let results_out: PathBuf = inference
        .results_dir
        .join(format!("{}_results.csv", classifier.name()));
    info!(
        "Running {} over crops listed in {}",
        classifier.name(),
        inference.attributes.display()
    );

    let config = InferenceConfig {
        attributes: inference.attributes,
        image_dir: inference.image_dir,
    };
    let summary = run_inference(classifier.as_ref(), &config, &results_out)?;
    info!(
        "{}: {} image(s), {} predicted, {} skipped -> {}",
        classifier.name(),
        summary.images,
        summary.predicted,
        summary.skipped,
        results_out.display()
    );
    Ok(())
}
