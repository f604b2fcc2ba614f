//! Multiplication options and configuration.

use std::time::Duration;

use crate::constants::{
    DEFAULT_MAX_PARALLEL_DEPTH, DEFAULT_POOL_WORKERS, DEFAULT_SAMPLE_INTERVAL, DEFAULT_THRESHOLD,
};
use crate::error::BlockError;

/// Options for one top-level multiplication.
#[derive(Debug, Clone)]
pub struct Options {
    /// Block size at or below which the dense kernel is called directly.
    pub threshold: usize,
    /// Number of recursion levels that fan out across a worker pool.
    pub max_parallel_depth: usize,
    /// Worker threads per fan-out pool.
    pub pool_workers: usize,
    /// Delay between two progress samples.
    pub sample_interval: Duration,
    /// Whether to run the progress sampler.
    pub report_progress: bool,
    /// Whether the product carries the direct-multiplication count.
    pub return_count: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            max_parallel_depth: DEFAULT_MAX_PARALLEL_DEPTH,
            pool_workers: DEFAULT_POOL_WORKERS,
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            report_progress: false,
            return_count: false,
        }
    }
}

impl Options {
    /// Normalize options, applying defaults where sizing values are zero.
    ///
    /// The threshold is left alone: zero is rejected by [`Options::validate`].
    #[must_use]
    pub fn normalize(mut self) -> Self {
        if self.pool_workers == 0 {
            self.pool_workers = DEFAULT_POOL_WORKERS;
        }
        if self.sample_interval.is_zero() {
            self.sample_interval = DEFAULT_SAMPLE_INTERVAL;
        }
        self
    }

    /// Check the options before any recursion starts.
    pub fn validate(&self) -> Result<(), BlockError> {
        if self.threshold == 0 {
            return Err(BlockError::Config("threshold must be positive".into()));
        }
        if self.pool_workers == 0 {
            return Err(BlockError::Config("pool_workers must be positive".into()));
        }
        Ok(())
    }

    /// Whether the operation count may undercount the 2x2 operation model.
    #[must_use]
    pub fn count_is_approximate(&self) -> bool {
        self.threshold > 1 && (self.return_count || self.report_progress)
    }
}
