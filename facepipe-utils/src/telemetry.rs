//! Lightweight timing utilities for optional performance tracing.
//!
//! A guard records the elapsed duration of a scoped operation and logs it
//! under the `facepipe::telemetry` target when dropped. Logging only occurs
//! when the requested level is enabled for that target, so the overhead is
//! negligible when tracing is off.

use std::{
    borrow::Cow,
    time::{Duration, Instant},
};

use log::{Level, log, log_enabled};

const TARGET: &str = "facepipe::telemetry";

/// RAII helper that logs how long an operation took when dropped.
pub struct TimingGuard {
    label: Cow<'static, str>,
    level: Level,
    start: Instant,
    active: bool,
}

impl TimingGuard {
    /// Consume the guard and return the elapsed duration without logging.
    pub fn finish(mut self) -> Duration {
        self.active = false;
        self.start.elapsed()
    }
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        if self.active {
            log!(
                target: TARGET,
                self.level,
                "{} completed in {:.2?}",
                self.label,
                self.start.elapsed()
            );
        }
    }
}

/// Create a timing guard that logs at the provided level when that level is
/// enabled for the telemetry target (e.g. via `RUST_LOG=facepipe=debug`).
pub fn timing_guard(label: impl Into<Cow<'static, str>>, level: Level) -> TimingGuard {
    TimingGuard {
        label: label.into(),
        level,
        start: Instant::now(),
        active: log_enabled!(target: TARGET, level),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_returns_elapsed_without_logging() {
        let guard = timing_guard("test-op", Level::Trace);
        let elapsed = guard.finish();
        assert!(elapsed >= Duration::ZERO);
    }
}
