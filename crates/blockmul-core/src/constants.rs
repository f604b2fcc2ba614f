//! Constants for recursion thresholds, pool sizing and progress sampling.

use std::time::Duration;

/// Default block size at or below which the dense kernel is used directly.
pub const DEFAULT_THRESHOLD: usize = 1;

/// Default number of recursion levels, counted from the top, that fan out in parallel.
pub const DEFAULT_MAX_PARALLEL_DEPTH: usize = 2;

/// Default number of worker threads in each fan-out pool.
pub const DEFAULT_POOL_WORKERS: usize = 7;

/// Default delay between two progress samples.
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(10);

/// Placeholder maximum declared to progress sinks when no predictor is configured.
pub const DEFAULT_PREDICTED_COUNT: u64 = 100;

/// Branching factor of the classical block method.
pub const CLASSICAL_BRANCHING: usize = 8;

/// Branching factor of Strassen-style methods.
pub const STRASSEN_BRANCHING: usize = 7;

/// Process exit codes.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Generic error.
    pub const ERROR_GENERIC: i32 = 1;
    /// Products from different multipliers did not match.
    pub const ERROR_MISMATCH: i32 = 3;
    /// Invalid configuration.
    pub const ERROR_CONFIG: i32 = 4;
    /// Operands violate the multiplication preconditions.
    pub const ERROR_INVALID_INPUT: i32 = 5;
}
