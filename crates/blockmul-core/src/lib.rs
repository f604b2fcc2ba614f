//! # blockmul-core
//!
//! Core library for recursive block matrix multiplication.
//! Implements the classical eight-product method, Strassen's method and
//! Winograd's variant over one policy-driven recursion with nested parallel
//! fan-out, shared operation counting and sampled progress.

pub mod constants;
pub mod counter;
pub mod engine;
pub mod error;
pub mod kernel;
pub mod matrix;
pub mod observer;
pub mod observers;
pub mod options;
pub mod policy;
pub mod pool;
pub mod progress;
pub mod registry;

// Re-exports
pub use constants::{
    exit_codes, DEFAULT_MAX_PARALLEL_DEPTH, DEFAULT_POOL_WORKERS, DEFAULT_SAMPLE_INTERVAL,
    DEFAULT_THRESHOLD,
};
pub use counter::OpCounter;
pub use engine::{BlockEngine, DirectMultiplier, ExecutionStats, MatrixMultiplier, Product};
pub use error::BlockError;
pub use kernel::{DenseKernel, DotKernel};
pub use matrix::Scalar;
pub use observer::ProgressSink;
pub use options::Options;
pub use policy::BlockPolicy;
pub use progress::{CountPredictor, ProgressUpdate};
pub use registry::{DefaultFactory, MultiplierFactory};

use ndarray::Array2;

/// Multiply two square matrices with the classical block method.
///
/// This is a convenience function for simple use cases. For other policies,
/// counting or progress, build a `BlockEngine` directly.
///
/// # Example
/// ```
/// use ndarray::array;
///
/// let a = array![[1.0, 2.0], [3.0, 4.0]];
/// let b = array![[5.0, 6.0], [7.0, 8.0]];
/// let c = blockmul_core::multiply(&a, &b).unwrap();
/// assert_eq!(c, array![[19.0, 22.0], [43.0, 50.0]]);
/// ```
pub fn multiply<T: Scalar>(a: &Array2<T>, b: &Array2<T>) -> Result<Array2<T>, BlockError> {
    BlockEngine::new(BlockPolicy::classical()).multiply(a, b)
}
