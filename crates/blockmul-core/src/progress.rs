//! Progress sampling and operation-count prediction.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use tracing::{debug, warn};

use crate::constants::DEFAULT_PREDICTED_COUNT;
use crate::counter::OpCounter;
use crate::error::BlockError;
use crate::matrix::next_power_of_two;
use crate::observer::ProgressSink;

/// Progress sample forwarded to sinks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressUpdate {
    /// Direct multiplications completed so far.
    pub current: u64,
    /// Predicted total (advisory, may be exceeded).
    pub max: u64,
    /// `current / max` clamped to [0.0, 1.0].
    pub progress: f64,
    /// Whether this is the final update.
    pub done: bool,
    /// Whether the call ended in an error (only set on the final update).
    pub failed: bool,
}

impl ProgressUpdate {
    /// Create an in-flight update.
    #[must_use]
    pub fn new(current: u64, max: u64) -> Self {
        Self {
            current,
            max,
            progress: ratio(current, max),
            done: false,
            failed: false,
        }
    }

    /// Create the final update of a call that completed.
    #[must_use]
    pub fn finished(current: u64, max: u64) -> Self {
        Self {
            current,
            max,
            progress: 1.0,
            done: true,
            failed: false,
        }
    }

    /// Create the final update of a call that failed.
    ///
    /// Progress stays at what was reached when the call stopped.
    #[must_use]
    pub fn failed(current: u64, max: u64) -> Self {
        Self {
            current,
            max,
            progress: ratio(current, max),
            done: true,
            failed: true,
        }
    }

    /// Progress as a fraction in [0.0, 1.0].
    #[must_use]
    pub fn fraction(&self) -> f64 {
        self.progress
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(current: u64, max: u64) -> f64 {
    if max == 0 {
        return 0.0;
    }
    (current as f64 / max as f64).clamp(0.0, 1.0)
}

/// Predicts the number of direct multiplications from `(matrix_size, threshold)`.
pub type CountPredictor = Arc<dyn Fn(usize, usize) -> u64 + Send + Sync>;

/// Predictor that always returns `value`.
#[must_use]
pub fn constant_predictor(value: u64) -> CountPredictor {
    Arc::new(move |_, _| value)
}

/// The placeholder predictor used when none is configured.
#[must_use]
pub fn default_predictor() -> CountPredictor {
    constant_predictor(DEFAULT_PREDICTED_COUNT)
}

/// Exact leaf count for a policy with `branching` recursive products per level.
///
/// Mirrors the engine's recursion: a block at or below the threshold is one
/// leaf, anything larger is padded to a power of two and halved.
///
/// # Example
/// ```
/// use blockmul_core::progress::branching_predictor;
///
/// let classical = branching_predictor(8);
/// assert_eq!(classical(2, 1), 8);
/// assert_eq!(classical(4, 1), 64);
/// assert_eq!(classical(4, 2), 8);
/// ```
#[must_use]
pub fn branching_predictor(branching: usize) -> CountPredictor {
    let branching = branching as u64;
    Arc::new(move |size, threshold| {
        let mut n = size;
        let mut count: u64 = 1;
        while n > threshold {
            count = count.saturating_mul(branching);
            n = next_power_of_two(n) / 2;
        }
        count
    })
}

/// Background sampler pushing a shared counter to a sink at a bounded rate.
///
/// The sampling thread stops when the guard is finished or dropped, after
/// sending one final `done` update. Dropping without `finish` reports the
/// call as failed.
pub struct ProgressSampler {
    stop: Option<Sender<bool>>,
    handle: Option<JoinHandle<()>>,
}

impl ProgressSampler {
    /// Start sampling `value` every `interval`.
    pub fn start(
        value: OpCounter,
        max: u64,
        interval: Duration,
        sink: Arc<dyn ProgressSink>,
    ) -> Result<Self, BlockError> {
        let (stop_tx, stop_rx) = bounded::<bool>(1);
        let handle = std::thread::Builder::new()
            .name("blockmul-progress".into())
            .spawn(move || {
                let mut last = None;
                let completed = loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            let current = value.read();
                            if last != Some(current) {
                                last = Some(current);
                                sink.on_progress(&ProgressUpdate::new(current, max));
                            }
                        }
                        Ok(completed) => break completed,
                        Err(RecvTimeoutError::Disconnected) => break false,
                    }
                };
                let current = value.read();
                let update = if completed {
                    ProgressUpdate::finished(current, max)
                } else {
                    ProgressUpdate::failed(current, max)
                };
                sink.on_progress(&update);
            })
            .map_err(|e| BlockError::Pool(format!("failed to start progress sampler: {e}")))?;
        debug!(max, interval_ms = interval.as_millis(), "progress sampler started");
        Ok(Self {
            stop: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Stop sampling and wait for the final update to be delivered.
    ///
    /// `completed` tells the sink whether the call produced a result.
    pub fn finish(mut self, completed: bool) {
        self.shutdown(completed);
    }

    fn shutdown(&mut self, completed: bool) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.try_send(completed);
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("progress sink panicked");
            }
        }
    }
}

impl Drop for ProgressSampler {
    fn drop(&mut self) {
        self.shutdown(false);
    }
}
