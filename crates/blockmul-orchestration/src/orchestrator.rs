//! Core orchestration: timed execution and result analysis.

use std::sync::Arc;
use std::time::Instant;

use ndarray::Array2;
use num_traits::ToPrimitive;
use tracing::{debug, warn};

use blockmul_core::engine::MatrixMultiplier;
use blockmul_core::error::BlockError;
use blockmul_core::matrix::Scalar;
use blockmul_core::options::Options;

use crate::interfaces::{CalculationResult, ProgressReporter};

/// Relative tolerance used when comparing products element-wise.
pub const DEFAULT_RELATIVE_TOLERANCE: f64 = 1e-9;

/// Run every multiplier on the same operands, one after the other.
///
/// Each multiplier parallelises internally, so running them back to back
/// keeps the timings comparable.
pub fn execute_products<T: Scalar>(
    multipliers: &[Arc<dyn MatrixMultiplier<T>>],
    a: &Array2<T>,
    b: &Array2<T>,
    opts: &Options,
    reporter: &dyn ProgressReporter,
) -> Vec<CalculationResult<T>> {
    let results = multipliers
        .iter()
        .enumerate()
        .map(|(i, multiplier)| {
            let sink = reporter.sink_for(i, multiplier.name());
            let start = Instant::now();
            let outcome = multiplier.multiply_with(a, b, opts, sink);
            let duration = start.elapsed();
            match &outcome {
                Ok(_) => debug!(algorithm = multiplier.name(), ?duration, "product computed"),
                Err(e) => warn!(algorithm = multiplier.name(), error = %e, "product failed"),
            }
            CalculationResult {
                algorithm: multiplier.name().to_string(),
                outcome,
                duration,
            }
        })
        .collect();
    reporter.complete();
    results
}

/// Analyze comparison results for mismatches.
///
/// Every successful product is compared to the first one within
/// `relative_tolerance`. When nothing succeeded, the first failure is returned.
pub fn analyze_comparison_results<T: Scalar + ToPrimitive>(
    results: &[CalculationResult<T>],
    relative_tolerance: f64,
) -> Result<(), BlockError> {
    let mut products = results.iter().filter_map(|r| r.outcome.as_ref().ok());

    let Some(reference) = products.next() else {
        return match results.iter().find_map(|r| r.outcome.as_ref().err()) {
            Some(err) => Err(err.clone()),
            None => Err(BlockError::Config("no multipliers were run".into())),
        };
    };

    for product in products {
        if !matrices_agree(&reference.matrix, &product.matrix, relative_tolerance) {
            return Err(BlockError::Mismatch);
        }
    }

    Ok(())
}

/// Element-wise comparison with a tolerance relative to the larger magnitude.
fn matrices_agree<T: Scalar + ToPrimitive>(
    expected: &Array2<T>,
    actual: &Array2<T>,
    relative_tolerance: f64,
) -> bool {
    if expected.dim() != actual.dim() {
        return false;
    }
    expected.iter().zip(actual.iter()).all(|(x, y)| {
        match (x.to_f64(), y.to_f64()) {
            (Some(x), Some(y)) => {
                let scale = x.abs().max(y.abs()).max(1.0);
                (x - y).abs() <= relative_tolerance * scale
            }
            _ => false,
        }
    })
}
