#![no_main]

use libfuzzer_sys::fuzz_target;
use ndarray::Array2;

use blockmul_core::engine::{BlockEngine, MatrixMultiplier};
use blockmul_core::options::Options;
use blockmul_core::policy::BlockPolicy;

fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }
    // First byte picks the size (1..=9), second the threshold (1..=4)
    let n = usize::from(data[0] % 9) + 1;
    let threshold = usize::from(data[1] % 4) + 1;
    let entries = &data[2..];

    let value = |k: usize| i64::from(entries[k % entries.len()] as i8);
    let a = Array2::from_shape_fn((n, n), |(i, j)| value(i * n + j));
    let b = Array2::from_shape_fn((n, n), |(i, j)| value(n * n + i * n + j));

    let opts = Options {
        threshold,
        max_parallel_depth: 1,
        pool_workers: 2,
        return_count: true,
        ..Default::default()
    };
    let product = BlockEngine::new(BlockPolicy::strassen())
        .multiply_with(&a, &b, &opts, None)
        .unwrap();
    assert_eq!(product.matrix, a.dot(&b));
});
