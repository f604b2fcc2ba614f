//! Scoped, non-restrictive worker pools for recursive fan-out.
//!
//! Each fan-out step builds its own bounded `rayon` pool and drops it when the
//! step completes. A worker may itself build and block on a further pool, so
//! recursion can keep fanning out from inside a worker; how deep that goes is
//! bounded by the caller's depth budget, not by the pool.
//!
//! Every submitted call has returned before `map` does, so no work outlives
//! the step. Dropping the pool only signals its threads to exit; rayon does
//! not join them, and they wind down asynchronously after the step returns.

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::iter::{IntoParallelIterator, ParallelIterator};
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::error::BlockError;

/// A fixed-size worker pool owned by one fan-out step.
pub struct WorkerPool {
    pool: ThreadPool,
    depth: usize,
}

impl WorkerPool {
    /// Build a pool of `workers` threads for a fan-out at remaining depth `depth`.
    pub fn new(workers: usize, depth: usize) -> Result<Self, BlockError> {
        if workers == 0 {
            return Err(BlockError::Config("worker pool needs at least one worker".into()));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(move |i| format!("blockmul-d{depth}-w{i}"))
            .build()
            .map_err(|e| BlockError::Pool(format!("failed to create worker pool: {e}")))?;
        debug!(workers, depth, "worker pool started");
        Ok(Self { pool, depth })
    }

    /// Build a pool, hand it to `f`, and release it when `f` returns.
    ///
    /// Its idle threads are signalled to exit but not joined.
    pub fn scoped<R>(
        workers: usize,
        depth: usize,
        f: impl FnOnce(&WorkerPool) -> Result<R, BlockError>,
    ) -> Result<R, BlockError> {
        let pool = Self::new(workers, depth)?;
        f(&pool)
    }

    /// Number of worker threads.
    #[must_use]
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run every call on the pool and return the results in submission order.
    ///
    /// The first failure wins: calls that have not started once a sibling
    /// failed are skipped, completed results are discarded, and the first
    /// real error is returned.
    pub fn map<C, R, F>(&self, calls: Vec<C>, run: F) -> Result<Vec<R>, BlockError>
    where
        C: Send,
        R: Send,
        F: Fn(C) -> Result<R, BlockError> + Send + Sync,
    {
        let failed = AtomicBool::new(false);

        let results: Vec<Result<R, BlockError>> = self.pool.install(|| {
            calls
                .into_par_iter()
                .map(|call| {
                    if failed.load(Ordering::Relaxed) {
                        return Err(BlockError::Aborted);
                    }
                    let result = run(call);
                    if result.is_err() {
                        failed.store(true, Ordering::Relaxed);
                    }
                    result
                })
                .collect()
        });

        let mut collected = Vec::with_capacity(results.len());
        let mut first_error: Option<BlockError> = None;
        let mut aborted = false;

        for result in results {
            match result {
                Ok(value) => collected.push(value),
                Err(BlockError::Aborted) => aborted = true,
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        if let Some(err) = first_error {
            return Err(err);
        }
        if aborted {
            return Err(BlockError::Aborted);
        }
        Ok(collected)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        debug!(depth = self.depth, "worker pool released");
    }
}
