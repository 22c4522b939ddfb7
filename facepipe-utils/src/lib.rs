//! Common helpers shared across facepipe crates.

/// Synthetic fixture generation for tests.
pub mod fixtures;
/// Image loading helpers.
pub mod image_utils;
/// Typed CSV table open/create helpers.
pub mod table;
/// Instrumentation helpers for optional performance tracing.
pub mod telemetry;

use anyhow::Result;
use log::LevelFilter;

pub use image_utils::load_image;
pub use table::{open_csv_reader, create_csv_writer};
pub use telemetry::{TimingGuard, timing_guard};

/// Initialize logging once for the CLI.
///
/// Respects the `RUST_LOG` environment variable if it is set, otherwise
/// falls back to the provided default filter level.
pub fn init_logging(default_filter: LevelFilter) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter.as_str()),
    );
    builder.filter_module("facepipe::telemetry", LevelFilter::Trace);

    // A second call (tests, embedding) is harmless.
    let _ = builder.try_init();
    Ok(())
}
