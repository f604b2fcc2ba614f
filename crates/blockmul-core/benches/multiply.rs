//! Criterion benchmarks for block multiplication policies.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array2;

use std::sync::Arc;

use blockmul_core::engine::{BlockEngine, DirectMultiplier, MatrixMultiplier};
use blockmul_core::observer::ProgressSink;
use blockmul_core::observers::NoOpSink;
use blockmul_core::options::Options;
use blockmul_core::policy::BlockPolicy;

fn operands(n: usize) -> (Array2<f64>, Array2<f64>) {
    let a = Array2::from_shape_fn((n, n), |(i, j)| ((i * 31 + j * 17) % 13) as f64 - 6.0);
    let b = Array2::from_shape_fn((n, n), |(i, j)| ((i * 7 + j * 29) % 11) as f64 - 5.0);
    (a, b)
}

fn bench_policies(c: &mut Criterion) {
    let sizes: Vec<usize> = vec![64, 128, 256];
    let opts = Options {
        threshold: 32,
        ..Default::default()
    };

    let multipliers: Vec<(&str, Box<dyn MatrixMultiplier<f64>>)> = vec![
        ("direct", Box::new(DirectMultiplier::new())),
        ("classical", Box::new(BlockEngine::new(BlockPolicy::classical()))),
        ("strassen", Box::new(BlockEngine::new(BlockPolicy::strassen()))),
        ("winograd", Box::new(BlockEngine::new(BlockPolicy::winograd()))),
    ];

    for (name, multiplier) in &multipliers {
        let mut group = c.benchmark_group(*name);
        for &n in &sizes {
            let (a, b) = operands(n);
            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |bench, _| {
                bench.iter(|| multiplier.multiply_with(&a, &b, &opts, None).unwrap());
            });
        }
        group.finish();
    }
}

fn bench_parallel_depth(c: &mut Criterion) {
    let engine = BlockEngine::new(BlockPolicy::<f64>::strassen());
    let (a, b) = operands(256);

    let mut group = c.benchmark_group("StrassenDepth");
    for depth in 0..=3 {
        let opts = Options {
            threshold: 32,
            max_parallel_depth: depth,
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |bench, _| {
            bench.iter(|| engine.multiply_with(&a, &b, &opts, None).unwrap());
        });
    }
    group.finish();
}

fn bench_progress_sampling(c: &mut Criterion) {
    let engine = BlockEngine::new(BlockPolicy::<f64>::classical());
    let (a, b) = operands(128);
    let sink: Arc<dyn ProgressSink> = Arc::new(NoOpSink::new());

    let mut group = c.benchmark_group("ProgressSampling");
    for report_progress in [false, true] {
        let opts = Options {
            threshold: 16,
            report_progress,
            ..Default::default()
        };
        group.bench_with_input(
            BenchmarkId::from_parameter(report_progress),
            &report_progress,
            |bench, _| {
                bench.iter(|| engine.multiply_with(&a, &b, &opts, Some(sink.clone())).unwrap());
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_policies, bench_parallel_depth, bench_progress_sampling);
criterion_main!(benches);
