//! Concrete progress sinks.

use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_channel::Sender;
use tracing::{debug, info, warn};

use crate::observer::ProgressSink;
use crate::progress::ProgressUpdate;

/// Sink that forwards samples through a channel (non-blocking).
pub struct ChannelSink {
    sender: Sender<ProgressUpdate>,
}

impl ChannelSink {
    /// Create a new channel sink.
    #[must_use]
    pub fn new(sender: Sender<ProgressUpdate>) -> Self {
        Self { sender }
    }
}

impl ProgressSink for ChannelSink {
    fn on_progress(&self, update: &ProgressUpdate) {
        // A full or closed channel drops the sample.
        let _ = self.sender.try_send(*update);
    }
}

/// Sink that logs samples with temporal throttling.
pub struct LoggingSink {
    min_interval_ms: u64,
    last_time: AtomicU64,
}

impl LoggingSink {
    /// Create a new logging sink with the given minimum interval between lines.
    #[must_use]
    pub fn new(min_interval_ms: u64) -> Self {
        Self {
            min_interval_ms,
            last_time: AtomicU64::new(0),
        }
    }
}

impl ProgressSink for LoggingSink {
    #[allow(clippy::cast_possible_truncation)]
    fn on_progress(&self, update: &ProgressUpdate) {
        if update.failed {
            warn!(
                multiplications = update.current,
                estimate = update.max,
                "Multiplication failed"
            );
            return;
        }
        if update.done {
            info!(
                multiplications = update.current,
                estimate = update.max,
                "Multiplication complete"
            );
            return;
        }

        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        let last_time = self.last_time.load(Ordering::Relaxed);
        if now.saturating_sub(last_time) < self.min_interval_ms {
            return;
        }
        self.last_time.store(now, Ordering::Relaxed);

        debug!(
            current = update.current,
            estimate = update.max,
            progress = format!("{:.1}%", update.fraction() * 100.0),
            "Progress update"
        );
    }
}

/// Null object pattern: discards every sample.
#[derive(Debug, Default)]
pub struct NoOpSink;

impl NoOpSink {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ProgressSink for NoOpSink {
    fn on_progress(&self, _update: &ProgressUpdate) {}
}
