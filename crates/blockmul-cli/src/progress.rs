//! Terminal progress bar sink.

use indicatif::{ProgressBar, ProgressStyle};

use blockmul_core::observer::ProgressSink;
use blockmul_core::progress::ProgressUpdate;

const BAR_TEMPLATE: &str =
    "{prefix:>10} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} products ({eta})";

/// Progress sink drawing one `indicatif` bar.
///
/// The bar length follows the declared maximum and grows when the count
/// overshoots it. A failed call leaves the bar where it stopped.
pub struct IndicatifSink {
    bar: ProgressBar,
}

impl IndicatifSink {
    /// Wrap an existing bar, labelling it with `algorithm`.
    #[must_use]
    pub fn new(bar: ProgressBar, algorithm: &str) -> Self {
        if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.set_prefix(algorithm.to_string());
        Self { bar }
    }

    /// A sink whose bar is never drawn.
    #[must_use]
    pub fn hidden(algorithm: &str) -> Self {
        Self::new(ProgressBar::hidden(), algorithm)
    }

    #[must_use]
    pub fn bar(&self) -> &ProgressBar {
        &self.bar
    }
}

impl ProgressSink for IndicatifSink {
    fn on_progress(&self, update: &ProgressUpdate) {
        self.bar.set_length(update.max.max(update.current));
        self.bar.set_position(update.current);
        if update.failed {
            self.bar.abandon();
        } else if update.done {
            self.bar.finish();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_tracks_updates() {
        let sink = IndicatifSink::hidden("strassen");
        sink.on_progress(&ProgressUpdate::new(10, 49));
        assert_eq!(sink.bar().position(), 10);
        assert_eq!(sink.bar().length(), Some(49));
    }

    #[test]
    fn overshoot_extends_bar() {
        let sink = IndicatifSink::hidden("classical");
        sink.on_progress(&ProgressUpdate::new(150, 100));
        assert_eq!(sink.bar().length(), Some(150));
    }

    #[test]
    fn done_finishes_bar() {
        let sink = IndicatifSink::hidden("winograd");
        sink.on_progress(&ProgressUpdate::finished(49, 49));
        assert!(sink.bar().is_finished());
    }

    #[test]
    fn failure_abandons_bar_at_reached_position() {
        let sink = IndicatifSink::hidden("strassen");
        sink.on_progress(&ProgressUpdate::new(20, 100));
        sink.on_progress(&ProgressUpdate::failed(20, 100));
        assert!(sink.bar().is_finished());
        assert_eq!(sink.bar().position(), 20);
        assert_eq!(sink.bar().length(), Some(100));
    }
}
