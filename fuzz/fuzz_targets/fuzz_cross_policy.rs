#![no_main]

use libfuzzer_sys::fuzz_target;
use ndarray::Array2;

use blockmul_core::engine::{BlockEngine, MatrixMultiplier};
use blockmul_core::options::Options;
use blockmul_core::policy::BlockPolicy;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let n = usize::from(data[0] % 6) + 1;
    let entries = &data[1..];
    let value = |k: usize| i64::from(entries[k % entries.len()]);
    let a = Array2::from_shape_fn((n, n), |(i, j)| value(i * n + j));
    let b = Array2::from_shape_fn((n, n), |(i, j)| value(j * n + i + 1));

    let opts = Options {
        max_parallel_depth: 0,
        return_count: true,
        ..Default::default()
    };
    let classical = BlockEngine::new(BlockPolicy::classical())
        .multiply_with(&a, &b, &opts, None)
        .unwrap();
    let strassen = BlockEngine::new(BlockPolicy::strassen())
        .multiply_with(&a, &b, &opts, None)
        .unwrap();
    let winograd = BlockEngine::new(BlockPolicy::winograd())
        .multiply_with(&a, &b, &opts, None)
        .unwrap();

    // Should agree, with 8 vs 7 products per level
    assert_eq!(classical.matrix, strassen.matrix);
    assert_eq!(classical.matrix, winograd.matrix);
    assert_eq!(strassen.count, winograd.count);
    assert!(classical.count >= strassen.count);
});
