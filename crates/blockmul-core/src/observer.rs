//! Progress sink interface.
//!
//! Sinks receive sampled `(current, max)` counts from the progress sampler.
//! Rendering is entirely their business.

use crate::progress::ProgressUpdate;

/// Receiver of sampled progress.
///
/// `max` is only an estimate, so implementations must tolerate `current`
/// overshooting it or stopping short of it.
pub trait ProgressSink: Send + Sync {
    /// Receive a progress sample.
    fn on_progress(&self, update: &ProgressUpdate);
}
