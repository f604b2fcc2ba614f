//! Recursive block-multiplication engine.
//!
//! `MatrixMultiplier` is the public trait consumed by orchestration.
//! `BlockEngine` drives any `BlockPolicy` through pad, split, scatter,
//! recurse and gather, fanning out across scoped worker pools while the
//! depth budget lasts. `DirectMultiplier` is a single kernel call.

use std::sync::Arc;
use std::time::Instant;

use ndarray::Array2;
use tracing::{debug, info, warn};

use crate::counter::OpCounter;
use crate::error::BlockError;
use crate::kernel::{DenseKernel, DotKernel};
use crate::matrix::{next_power_of_two, pad_to, truncate, validate_operands, QuadrantGrid, Scalar};
use crate::observer::ProgressSink;
use crate::observers::LoggingSink;
use crate::options::Options;
use crate::policy::BlockPolicy;
use crate::pool::WorkerPool;
use crate::progress::{default_predictor, CountPredictor, ProgressSampler, ProgressUpdate};

/// Throttle used by the fallback logging sink, in milliseconds.
const FALLBACK_LOG_INTERVAL_MS: u64 = 250;

/// Instrumentation collected during one top-level call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionStats {
    /// Number of dense kernel calls.
    pub direct_multiplications: u64,
    /// Number of recursion steps that fanned out across a worker pool.
    pub parallel_fanouts: u64,
    /// Side of the padded square the recursion started from.
    pub padded_size: usize,
}

/// Result of one top-level multiplication.
#[derive(Debug, Clone)]
pub struct Product<T> {
    /// The product, truncated to the operands' original shape.
    pub matrix: Array2<T>,
    /// Direct-multiplication count, present when requested.
    pub count: Option<u64>,
    pub stats: ExecutionStats,
}

/// Common interface for everything that can multiply two matrices.
pub trait MatrixMultiplier<T: Scalar>: Send + Sync {
    /// Multiply `a` by `b` under `opts`, reporting progress to `sink` if requested.
    fn multiply_with(
        &self,
        a: &Array2<T>,
        b: &Array2<T>,
        opts: &Options,
        sink: Option<Arc<dyn ProgressSink>>,
    ) -> Result<Product<T>, BlockError>;

    /// Get the name of this multiplier.
    fn name(&self) -> &str;
}

/// Per-call recursion state handed down to every child call.
///
/// Threshold and worker count never change within one top-level call; the
/// depth budget shrinks by one per level and stops at zero.
#[derive(Debug, Clone)]
pub struct RecursionState {
    pub threshold: usize,
    pub depth: usize,
    pub workers: usize,
    pub counter: OpCounter,
    pub progress: Option<OpCounter>,
    pub fanouts: OpCounter,
}

impl RecursionState {
    /// Fresh state for a top-level call.
    #[must_use]
    pub fn new(opts: &Options) -> Self {
        Self {
            threshold: opts.threshold,
            depth: opts.max_parallel_depth,
            workers: opts.pool_workers,
            counter: OpCounter::new(),
            progress: opts.report_progress.then(OpCounter::new),
            fanouts: OpCounter::new(),
        }
    }

    /// State for the calls one level down, sharing every counter.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            depth: self.depth.saturating_sub(1),
            ..self.clone()
        }
    }

    fn record_leaf(&self) {
        self.counter.increment(1);
        if let Some(progress) = &self.progress {
            progress.increment(1);
        }
    }
}

/// One unit of recursive work: two operand blocks and the state to multiply them under.
#[derive(Debug)]
pub struct MultiplyCall<T> {
    pub left: Array2<T>,
    pub right: Array2<T>,
    pub state: RecursionState,
}

/// Divide-and-conquer multiplier driven by a pluggable policy.
pub struct BlockEngine<T> {
    policy: Arc<BlockPolicy<T>>,
    kernel: Arc<dyn DenseKernel<T>>,
    options: Options,
    predictor: CountPredictor,
}

impl<T: Scalar> BlockEngine<T> {
    /// Create an engine for `policy` backed by the `ndarray` dot kernel.
    #[must_use]
    pub fn new(policy: BlockPolicy<T>) -> Self {
        Self::from_shared(Arc::new(policy))
    }

    /// Create an engine sharing an existing policy.
    #[must_use]
    pub fn from_shared(policy: Arc<BlockPolicy<T>>) -> Self {
        Self {
            policy,
            kernel: Arc::new(DotKernel::new()),
            options: Options::default(),
            predictor: default_predictor(),
        }
    }

    /// Replace the dense kernel used at the leaves.
    #[must_use]
    pub fn with_kernel(mut self, kernel: Arc<dyn DenseKernel<T>>) -> Self {
        self.kernel = kernel;
        self
    }

    /// Replace the options used by [`BlockEngine::multiply`] and
    /// [`BlockEngine::multiply_counted`].
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Replace the predictor declaring the progress maximum.
    #[must_use]
    pub fn with_predictor(mut self, predictor: CountPredictor) -> Self {
        self.predictor = predictor;
        self
    }

    #[must_use]
    pub fn policy(&self) -> &BlockPolicy<T> {
        &self.policy
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Multiply with the engine's options.
    pub fn multiply(&self, a: &Array2<T>, b: &Array2<T>) -> Result<Array2<T>, BlockError> {
        Ok(self.run(a, b, &self.options, None)?.matrix)
    }

    /// Multiply with the engine's options and return the direct-multiplication count.
    pub fn multiply_counted(
        &self,
        a: &Array2<T>,
        b: &Array2<T>,
    ) -> Result<(Array2<T>, u64), BlockError> {
        let opts = Options {
            return_count: true,
            ..self.options.clone()
        };
        let product = self.run(a, b, &opts, None)?;
        Ok((product.matrix, product.stats.direct_multiplications))
    }

    fn run(
        &self,
        a: &Array2<T>,
        b: &Array2<T>,
        opts: &Options,
        sink: Option<Arc<dyn ProgressSink>>,
    ) -> Result<Product<T>, BlockError> {
        validate_operands(a, b)?;
        opts.validate()?;

        if opts.count_is_approximate() {
            warn!(
                threshold = opts.threshold,
                "operation count treats every block at or below the threshold as one multiplication"
            );
        }

        let (rows, cols) = (a.nrows(), b.ncols());
        let state = RecursionState::new(opts);
        let counter = state.counter.clone();
        let fanouts = state.fanouts.clone();

        let sampler = match &state.progress {
            Some(value) => {
                let sink: Arc<dyn ProgressSink> = match sink {
                    Some(sink) => sink,
                    None => Arc::new(LoggingSink::new(FALLBACK_LOG_INTERVAL_MS)),
                };
                let max = (self.predictor)(rows, opts.threshold);
                Some(ProgressSampler::start(value.clone(), max, opts.sample_interval, sink)?)
            }
            None => None,
        };

        let start = Instant::now();
        let result = self.recurse(MultiplyCall {
            left: a.clone(),
            right: b.clone(),
            state,
        });
        if let Some(sampler) = sampler {
            sampler.finish(result.is_ok());
        }
        let matrix = truncate(result?, rows, cols);

        let stats = ExecutionStats {
            direct_multiplications: counter.read(),
            parallel_fanouts: fanouts.read(),
            padded_size: if rows <= opts.threshold {
                rows
            } else {
                next_power_of_two(rows)
            },
        };
        info!(
            policy = self.policy.name(),
            size = rows,
            direct = stats.direct_multiplications,
            fanouts = stats.parallel_fanouts,
            elapsed_ms = start.elapsed().as_millis(),
            "block multiplication complete"
        );

        Ok(Product {
            matrix,
            count: opts.return_count.then_some(stats.direct_multiplications),
            stats,
        })
    }

    /// Multiply one pair of blocks, recursing until they fit under the threshold.
    fn recurse(&self, call: MultiplyCall<T>) -> Result<Array2<T>, BlockError> {
        let MultiplyCall { left, right, state } = call;
        let n = left.nrows();

        if n <= state.threshold {
            let product = self.kernel.multiply(left.view(), right.view())?;
            state.record_leaf();
            return Ok(product);
        }

        let size = next_power_of_two(n.max(left.ncols()).max(right.ncols()));
        let left = pad_to(left, size)?;
        let right = pad_to(right, size)?;
        let a = QuadrantGrid::split(&left)?;
        let b = QuadrantGrid::split(&right)?;
        let half = a.half();

        let child = state.child();
        let calls: Vec<MultiplyCall<T>> = self
            .policy
            .scatter(&a, &b)?
            .into_iter()
            .map(|(left, right)| MultiplyCall {
                left,
                right,
                state: child.clone(),
            })
            .collect();

        let results = if state.depth > 0 {
            state.fanouts.increment(1);
            debug!(size, depth = state.depth, targets = calls.len(), "parallel fan-out");
            WorkerPool::scoped(state.workers, state.depth, |pool| {
                pool.map(calls, |call| self.recurse(call))
            })?
        } else {
            calls
                .into_iter()
                .map(|call| self.recurse(call))
                .collect::<Result<Vec<_>, _>>()?
        };

        self.policy.gather(&results, half)
    }
}

impl<T: Scalar> MatrixMultiplier<T> for BlockEngine<T> {
    fn multiply_with(
        &self,
        a: &Array2<T>,
        b: &Array2<T>,
        opts: &Options,
        sink: Option<Arc<dyn ProgressSink>>,
    ) -> Result<Product<T>, BlockError> {
        self.run(a, b, opts, sink)
    }

    fn name(&self) -> &str {
        self.policy.name()
    }
}

/// Single dense kernel call, used as the reference product.
pub struct DirectMultiplier<T> {
    kernel: Arc<dyn DenseKernel<T>>,
}

impl<T: Scalar> DirectMultiplier<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            kernel: Arc::new(DotKernel::new()),
        }
    }

    #[must_use]
    pub fn with_kernel(kernel: Arc<dyn DenseKernel<T>>) -> Self {
        Self { kernel }
    }
}

impl<T: Scalar> Default for DirectMultiplier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> MatrixMultiplier<T> for DirectMultiplier<T> {
    fn multiply_with(
        &self,
        a: &Array2<T>,
        b: &Array2<T>,
        opts: &Options,
        sink: Option<Arc<dyn ProgressSink>>,
    ) -> Result<Product<T>, BlockError> {
        validate_operands(a, b)?;
        opts.validate()?;
        let result = self.kernel.multiply(a.view(), b.view());
        if opts.report_progress {
            if let Some(sink) = sink {
                let update = match &result {
                    Ok(_) => ProgressUpdate::finished(1, 1),
                    Err(_) => ProgressUpdate::failed(0, 1),
                };
                sink.on_progress(&update);
            }
        }
        let matrix = result?;
        Ok(Product {
            matrix,
            count: opts.return_count.then_some(1),
            stats: ExecutionStats {
                direct_multiplications: 1,
                parallel_fanouts: 0,
                padded_size: a.nrows(),
            },
        })
    }

    fn name(&self) -> &str {
        "direct"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, ArrayView2};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn sample(n: usize) -> (Array2<i64>, Array2<i64>) {
        let a = Array2::from_shape_fn((n, n), |(i, j)| ((i * 7 + j * 3) % 11) as i64 - 5);
        let b = Array2::from_shape_fn((n, n), |(i, j)| ((i * 2 + j * 5) % 9) as i64 - 4);
        (a, b)
    }

    fn engines() -> Vec<BlockEngine<i64>> {
        vec![
            BlockEngine::new(BlockPolicy::classical()),
            BlockEngine::new(BlockPolicy::strassen()),
            BlockEngine::new(BlockPolicy::winograd()),
        ]
    }

    fn counted(engine: &BlockEngine<i64>, n: usize, opts: Options) -> Product<i64> {
        let (a, b) = sample(n);
        engine
            .multiply_with(&a, &b, &Options { return_count: true, ..opts }, None)
            .unwrap()
    }

    #[test]
    fn policies_match_dot() {
        for n in [1, 2, 4, 8, 16] {
            let (a, b) = sample(n);
            for engine in engines() {
                assert_eq!(engine.multiply(&a, &b).unwrap(), a.dot(&b), "{} n={n}", engine.name());
            }
        }
    }

    #[test]
    fn padding_is_transparent() {
        for n in [3, 5, 6, 7] {
            let (a, b) = sample(n);
            for engine in engines() {
                let c = engine.multiply(&a, &b).unwrap();
                assert_eq!(c.dim(), (n, n));
                assert_eq!(c, a.dot(&b));
            }
        }
    }

    #[test]
    fn float_product_matches_dot() {
        let a = Array2::from_shape_fn((6, 6), |(i, j)| (i as f64).sin() + j as f64 * 0.5);
        let b = Array2::from_shape_fn((6, 6), |(i, j)| (j as f64).cos() - i as f64 * 0.25);
        let expected = a.dot(&b);
        let c = BlockEngine::new(BlockPolicy::strassen()).multiply(&a, &b).unwrap();
        for (x, y) in c.iter().zip(expected.iter()) {
            assert!((x - y).abs() < 1e-9);
        }
    }

    #[test]
    fn count_at_unit_threshold() {
        let classical = BlockEngine::new(BlockPolicy::<i64>::classical());
        let strassen = BlockEngine::new(BlockPolicy::<i64>::strassen());
        assert_eq!(counted(&classical, 1, Options::default()).count, Some(1));
        assert_eq!(counted(&classical, 2, Options::default()).count, Some(8));
        assert_eq!(counted(&classical, 4, Options::default()).count, Some(64));
        assert_eq!(counted(&strassen, 2, Options::default()).count, Some(7));
        assert_eq!(counted(&strassen, 4, Options::default()).count, Some(49));
    }

    #[test]
    fn count_above_unit_threshold() {
        let classical = BlockEngine::new(BlockPolicy::<i64>::classical());
        let opts = Options {
            threshold: 2,
            ..Default::default()
        };
        assert_eq!(counted(&classical, 2, opts.clone()).count, Some(1));
        assert_eq!(counted(&classical, 4, opts).count, Some(8));
    }

    #[test]
    fn multiply_counted_reports_leaves() {
        let (a, b) = sample(4);
        let (c, count) = BlockEngine::new(BlockPolicy::strassen())
            .multiply_counted(&a, &b)
            .unwrap();
        assert_eq!(c, a.dot(&b));
        assert_eq!(count, 49);
    }

    #[test]
    fn count_absent_unless_requested() {
        let (a, b) = sample(2);
        let product = BlockEngine::new(BlockPolicy::classical())
            .multiply_with(&a, &b, &Options::default(), None)
            .unwrap();
        assert_eq!(product.count, None);
        assert_eq!(product.stats.direct_multiplications, 8);
    }

    #[test]
    fn depth_changes_fanouts_not_result() {
        let engine = BlockEngine::new(BlockPolicy::<i64>::classical());
        let (a, b) = sample(8);
        let expected = a.dot(&b);

        let mut fanouts = Vec::new();
        for depth in 0..4 {
            let opts = Options {
                max_parallel_depth: depth,
                pool_workers: 3,
                ..Default::default()
            };
            let product = engine.multiply_with(&a, &b, &opts, None).unwrap();
            assert_eq!(product.matrix, expected);
            assert_eq!(product.stats.direct_multiplications, 512);
            assert_eq!(product.stats.padded_size, 8);
            fanouts.push(product.stats.parallel_fanouts);
        }
        // Level one fans out once, level two eight times, level three 64 times.
        assert_eq!(fanouts, vec![0, 1, 9, 73]);
    }

    #[test]
    fn invalid_operands_rejected() {
        let engine = BlockEngine::new(BlockPolicy::<i64>::classical());
        let a = Array2::<i64>::zeros((2, 3));
        assert!(matches!(engine.multiply(&a, &a), Err(BlockError::InvalidInput(_))));

        let a = Array2::<i64>::zeros((2, 2));
        let b = Array2::<i64>::zeros((3, 3));
        assert!(matches!(engine.multiply(&a, &b), Err(BlockError::InvalidInput(_))));
    }

    #[test]
    fn zero_threshold_rejected() {
        let (a, b) = sample(2);
        let opts = Options {
            threshold: 0,
            ..Default::default()
        };
        let result = BlockEngine::new(BlockPolicy::classical()).multiply_with(&a, &b, &opts, None);
        assert!(matches!(result, Err(BlockError::Config(_))));
    }

    /// Sleeps longer for blocks whose top-left entry is smaller.
    struct DelayKernel {
        calls: AtomicUsize,
    }

    impl DenseKernel<i64> for DelayKernel {
        fn multiply(
            &self,
            a: ArrayView2<'_, i64>,
            b: ArrayView2<'_, i64>,
        ) -> Result<Array2<i64>, BlockError> {
            let n = self.calls.fetch_add(1, Ordering::Relaxed);
            std::thread::sleep(Duration::from_millis(8u64.saturating_sub(n as u64 % 8)));
            DotKernel::new().multiply(a, b)
        }

        fn name(&self) -> &str {
            "delay"
        }
    }

    #[test]
    fn completion_order_does_not_change_result() {
        let (a, b) = sample(4);
        let opts = Options {
            threshold: 2,
            max_parallel_depth: 1,
            pool_workers: 8,
            ..Default::default()
        };
        for policy in [BlockPolicy::classical(), BlockPolicy::strassen()] {
            let policy = Arc::new(policy);
            let serial = BlockEngine::from_shared(policy.clone())
                .multiply_with(&a, &b, &Options { max_parallel_depth: 0, ..opts.clone() }, None)
                .unwrap();
            let delayed = BlockEngine::from_shared(policy).with_kernel(Arc::new(DelayKernel {
                calls: AtomicUsize::new(0),
            }));
            let parallel = delayed.multiply_with(&a, &b, &opts, None).unwrap();
            assert_eq!(parallel.matrix, serial.matrix);
            assert_eq!(parallel.matrix, a.dot(&b));
            assert_eq!(parallel.stats.parallel_fanouts, 1);
            assert_eq!(serial.stats.parallel_fanouts, 0);
        }
    }

    /// Fails on any block containing the marker value.
    struct PoisonKernel;

    impl DenseKernel<i64> for PoisonKernel {
        fn multiply(
            &self,
            a: ArrayView2<'_, i64>,
            b: ArrayView2<'_, i64>,
        ) -> Result<Array2<i64>, BlockError> {
            if a.iter().any(|&x| x == 99) {
                return Err(BlockError::Shape("poisoned block".into()));
            }
            DotKernel::new().multiply(a, b)
        }

        fn name(&self) -> &str {
            "poison"
        }
    }

    #[test]
    fn failure_propagates_at_any_depth() {
        let mut a = Array2::<i64>::ones((8, 8));
        a[[7, 7]] = 99;
        let b = Array2::<i64>::ones((8, 8));
        for depth in [0, 2] {
            let opts = Options {
                max_parallel_depth: depth,
                pool_workers: 2,
                ..Default::default()
            };
            let engine = BlockEngine::new(BlockPolicy::classical()).with_kernel(Arc::new(PoisonKernel));
            let result = engine.multiply_with(&a, &b, &opts, None);
            assert!(
                matches!(&result, Err(BlockError::Shape(msg)) if msg == "poisoned block"),
                "depth {depth}: {result:?}"
            );
        }
    }

    #[test]
    fn failing_gather_fails_whole_call() {
        use crate::policy::{gather_sum, GatherGrid, ScatterTarget};

        // Classical scatter with a gather task that reads a result that never exists.
        let scatter: Vec<ScatterTarget<i64>> = (0..8)
            .map(|_| ScatterTarget::new(|a, _| Ok(a.q11().clone()), |_, b| Ok(b.q11().clone())))
            .collect();
        let gather: GatherGrid<i64> = [
            [gather_sum(&[0], &[]), gather_sum(&[1], &[])],
            [gather_sum(&[2], &[]), gather_sum(&[42], &[])],
        ];
        let broken = BlockEngine::new(BlockPolicy::new("broken", scatter, gather));
        let (a, b) = sample(4);
        for depth in [0, 2] {
            let opts = Options {
                max_parallel_depth: depth,
                ..Default::default()
            };
            let result = broken.multiply_with(&a, &b, &opts, None);
            assert!(matches!(result, Err(BlockError::Policy(_))));
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        updates: Mutex<Vec<ProgressUpdate>>,
    }

    impl ProgressSink for RecordingSink {
        fn on_progress(&self, update: &ProgressUpdate) {
            self.updates.lock().push(*update);
        }
    }

    #[test]
    fn progress_reaches_sink() {
        let (a, b) = sample(8);
        let sink = Arc::new(RecordingSink::default());
        let opts = Options {
            report_progress: true,
            sample_interval: Duration::from_millis(1),
            ..Default::default()
        };
        let engine = BlockEngine::new(BlockPolicy::classical())
            .with_predictor(crate::progress::branching_predictor(8));
        engine.multiply_with(&a, &b, &opts, Some(sink.clone())).unwrap();

        let updates = sink.updates.lock();
        let last = updates.last().unwrap();
        assert!(last.done);
        assert_eq!(last.current, 512);
        assert_eq!(last.max, 512);
    }

    #[test]
    fn direct_multiplier_counts_one() {
        let (a, b) = sample(5);
        let opts = Options {
            return_count: true,
            ..Default::default()
        };
        let product = DirectMultiplier::new().multiply_with(&a, &b, &opts, None).unwrap();
        assert_eq!(product.matrix, a.dot(&b));
        assert_eq!(product.count, Some(1));
        assert_eq!(product.stats.padded_size, 5);
    }

    #[test]
    fn multipliers_share_trait() {
        let multipliers: Vec<Box<dyn MatrixMultiplier<i64>>> = vec![
            Box::new(DirectMultiplier::new()),
            Box::new(BlockEngine::new(BlockPolicy::winograd())),
        ];
        let a = array![[1i64, 2], [3, 4]];
        let b = array![[5i64, 6], [7, 8]];
        for m in &multipliers {
            let product = m.multiply_with(&a, &b, &Options::default(), None).unwrap();
            assert_eq!(product.matrix, array![[19, 22], [43, 50]], "{}", m.name());
        }
    }

    #[test]
    fn sampler_stops_when_call_fails() {
        let mut a = Array2::<i64>::ones((8, 8));
        a[[7, 7]] = 99;
        let b = Array2::<i64>::ones((8, 8));
        for depth in [0, 2] {
            let sink = Arc::new(RecordingSink::default());
            let opts = Options {
                max_parallel_depth: depth,
                pool_workers: 2,
                report_progress: true,
                sample_interval: Duration::from_millis(1),
                ..Default::default()
            };
            let engine = BlockEngine::new(BlockPolicy::classical()).with_kernel(Arc::new(PoisonKernel));
            let result = engine.multiply_with(&a, &b, &opts, Some(sink.clone()));
            assert!(result.is_err(), "depth {depth}");

            let delivered = sink.updates.lock().len();
            std::thread::sleep(Duration::from_millis(30));
            let updates = sink.updates.lock();
            assert_eq!(updates.len(), delivered, "depth {depth}: sampler outlived the call");
            let last = updates.last().unwrap();
            assert!(last.done && last.failed, "depth {depth}: {last:?}");
            assert_eq!(updates.iter().filter(|u| u.done).count(), 1);
        }
    }

    /// Classical targets whose left operand refuses a 1x1 quadrant holding the marker.
    fn guarded_classical() -> BlockPolicy<i64> {
        use crate::policy::{gather_sum, GatherGrid, ScatterTarget};

        let mut scatter = Vec::new();
        for (row, col) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            for k in 0..2 {
                scatter.push(ScatterTarget::new(
                    move |a: &QuadrantGrid<i64>, _: &QuadrantGrid<i64>| {
                        let block = a.get(row, k);
                        if block.len() == 1 && block.iter().any(|&x| x == 99) {
                            return Err(BlockError::Policy("marked quadrant".into()));
                        }
                        Ok(block.clone())
                    },
                    move |_: &QuadrantGrid<i64>, b: &QuadrantGrid<i64>| Ok(b.get(k, col).clone()),
                ));
            }
        }
        let gather: GatherGrid<i64> = [
            [gather_sum(&[0, 1], &[]), gather_sum(&[2, 3], &[])],
            [gather_sum(&[4, 5], &[]), gather_sum(&[6, 7], &[])],
        ];
        BlockPolicy::new("guarded", scatter, gather)
    }

    #[test]
    fn decomposer_failure_on_one_quadrant_fails_whole_call() {
        let engine = BlockEngine::new(guarded_classical());
        let (clean, b) = sample(8);
        let mut marked = clean.clone();
        marked[[5, 2]] = 99;

        for depth in [0, 1, 3] {
            let opts = Options {
                max_parallel_depth: depth,
                pool_workers: 3,
                ..Default::default()
            };
            let ok = engine.multiply_with(&clean, &b, &opts, None).unwrap();
            assert_eq!(ok.matrix, clean.dot(&b));

            let result = engine.multiply_with(&marked, &b, &opts, None);
            assert!(
                matches!(&result, Err(BlockError::Policy(msg)) if msg == "marked quadrant"),
                "depth {depth}: {result:?}"
            );
        }
    }
}
