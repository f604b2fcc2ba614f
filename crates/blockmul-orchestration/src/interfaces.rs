//! Orchestration interfaces.

use std::sync::Arc;
use std::time::Duration;

use blockmul_core::engine::Product;
use blockmul_core::error::BlockError;
use blockmul_core::observer::ProgressSink;

/// Supplies a progress sink for each multiplier of a run.
pub trait ProgressReporter: Send + Sync {
    /// Sink for the multiplier at `index`, or `None` to skip progress for it.
    fn sink_for(&self, index: usize, algorithm: &str) -> Option<Arc<dyn ProgressSink>>;

    /// Report that every multiplier has finished.
    fn complete(&self);
}

/// Trait for presenting results to the user.
pub trait ResultPresenter: Send + Sync {
    /// Present a single product.
    fn present_result(&self, result: &CalculationResult<f64>, size: usize, details: bool);

    /// Present a comparison of several products.
    fn present_comparison(&self, results: &[CalculationResult<f64>]);

    /// Present an error.
    fn present_error(&self, error: &str);
}

/// Result of running one multiplier.
#[derive(Debug, Clone)]
pub struct CalculationResult<T> {
    /// Multiplier name.
    pub algorithm: String,
    /// The product or a structured error.
    pub outcome: Result<Product<T>, BlockError>,
    /// Wall-clock duration of the call.
    pub duration: Duration,
}

impl<T> CalculationResult<T> {
    /// Whether the multiplier produced a product.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Null progress reporter (does nothing).
pub struct NullProgressReporter;

impl ProgressReporter for NullProgressReporter {
    fn sink_for(&self, _index: usize, _algorithm: &str) -> Option<Arc<dyn ProgressSink>> {
        None
    }

    fn complete(&self) {}
}
