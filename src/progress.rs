//! Progress reporting for the archive download.
//!
//! The downloader reports byte progress through the [`ProgressReporter`]
//! trait rather than driving a terminal widget directly, so tests and
//! non-interactive runs can substitute [`SilentProgress`]. The interactive
//! implementation, [`TransferProgress`], wraps an `indicatif` bar with
//! byte formatting and ETA.
//!
//! Progress display is a side effect, never a correctness concern: a
//! reporter that does nothing changes no pipeline behavior.
//!
//! # Environment Variables
//!
//! - `KIRO_UP_NO_PROGRESS`: set to any value to disable progress bars
//!   (also set by the `--no-progress` flag).

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};

/// Checks if progress bars should be disabled.
fn is_progress_disabled() -> bool {
    std::env::var("KIRO_UP_NO_PROGRESS").is_ok()
}

/// Byte-progress sink injected into the downloader.
pub trait ProgressReporter: Send + Sync {
    /// Called once before the first chunk, with the total size when the
    /// server advertised one.
    fn begin(&self, total_bytes: Option<u64>);

    /// Called after each chunk is written to disk.
    fn advance(&self, bytes: u64);

    /// Called once after the last chunk.
    fn finish(&self);
}

/// Reporter that swallows all progress events.
///
/// Used in tests and wherever byte progress is irrelevant.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn begin(&self, _total_bytes: Option<u64>) {}
    fn advance(&self, _bytes: u64) {}
    fn finish(&self) {}
}

/// Interactive byte-progress bar for archive downloads.
///
/// Hidden automatically when `KIRO_UP_NO_PROGRESS` is set, in which case
/// all operations become no-ops.
pub struct TransferProgress {
    inner: IndicatifBar,
}

impl TransferProgress {
    /// Create a download progress bar with the default styling.
    #[must_use]
    pub fn new() -> Self {
        let bar = if is_progress_disabled() {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::no_length();
            bar.set_style(bytes_style());
            bar.set_prefix("downloading");
            bar
        };
        Self { inner: bar }
    }
}

impl Default for TransferProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for TransferProgress {
    fn begin(&self, total_bytes: Option<u64>) {
        if let Some(total) = total_bytes {
            self.inner.set_length(total);
        }
        self.inner.set_position(0);
    }

    fn advance(&self, bytes: u64) {
        self.inner.inc(bytes);
    }

    fn finish(&self) {
        self.inner.finish_and_clear();
    }
}

fn bytes_style() -> IndicatifStyle {
    IndicatifStyle::default_bar()
        .template("{prefix:.bold} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
        .unwrap()
        .progress_chars("━╸━")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_reporter_ignores_all_events() {
        let reporter = SilentProgress;
        reporter.begin(Some(100));
        reporter.advance(50);
        reporter.advance(50);
        reporter.finish();
    }

    #[test]
    fn transfer_progress_accepts_unknown_totals() {
        let reporter = TransferProgress::new();
        reporter.begin(None);
        reporter.advance(1024);
        reporter.finish();
    }
}
