//! Spinner-based progress output for the build pipeline.
//!
//! The build is a sequence of short, blocking phases; a single spinner with
//! a rotating status message mirrors that well. Spinners are suppressed
//! through a process-local flag (set by the CLI for `--no-progress` and
//! `--quiet`), with the `SWRB_NO_PROGRESS` environment variable as a
//! read-only override so CI logs stay clean without extra flags.

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

static PROGRESS_DISABLED: AtomicBool = AtomicBool::new(false);

/// Suppress or re-enable progress output for this process.
pub fn set_progress_disabled(disabled: bool) {
    PROGRESS_DISABLED.store(disabled, Ordering::Relaxed);
}

/// Check whether progress output should be suppressed.
pub fn is_progress_disabled() -> bool {
    PROGRESS_DISABLED.load(Ordering::Relaxed) || std::env::var_os("SWRB_NO_PROGRESS").is_some()
}

/// A status spinner shown while a build phase runs.
pub struct ProgressSpinner {
    bar: IndicatifBar,
}

impl ProgressSpinner {
    /// Create and start a new spinner with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        let bar = if is_progress_disabled() {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{spinner:.green} {msg}")
                    .expect("valid spinner template"),
            );
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        };
        bar.set_message(message.into());
        Self { bar }
    }

    /// Update the status message.
    pub fn set_message(&self, message: impl Into<String>) {
        self.bar.set_message(message.into());
    }

    /// Stop the spinner and print a final message.
    pub fn finish_with_message(&self, message: impl Into<String>) {
        self.bar.finish_with_message(message.into());
    }

    /// Stop the spinner and remove it from the terminal.
    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}
