//! Multiplier selection logic.

use std::sync::Arc;

use blockmul_core::engine::MatrixMultiplier;
use blockmul_core::error::BlockError;
use blockmul_core::matrix::Scalar;
use blockmul_core::registry::MultiplierFactory;

/// Get multipliers to run based on algorithm selection.
///
/// `"all"` selects every name the factory knows, in its listing order.
pub fn get_multipliers_to_run<T: Scalar>(
    algo: &str,
    factory: &dyn MultiplierFactory<T>,
) -> Result<Vec<Arc<dyn MatrixMultiplier<T>>>, BlockError> {
    match algo {
        "all" => factory.available().into_iter().map(|name| factory.get(name)).collect(),
        name => Ok(vec![factory.get(name)?]),
    }
}
