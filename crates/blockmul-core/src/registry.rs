//! Multiplier factory and registry.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::constants::{CLASSICAL_BRANCHING, STRASSEN_BRANCHING};
use crate::engine::{BlockEngine, DirectMultiplier, MatrixMultiplier};
use crate::error::BlockError;
use crate::matrix::Scalar;
use crate::policy::BlockPolicy;
use crate::progress::branching_predictor;

/// Factory trait for creating multipliers by name.
pub trait MultiplierFactory<T: Scalar>: Send + Sync {
    /// Get or create a multiplier by name.
    fn get(&self, name: &str) -> Result<Arc<dyn MatrixMultiplier<T>>, BlockError>;

    /// List all available multiplier names.
    fn available(&self) -> Vec<&str>;
}

/// Default factory with lazy creation and cache.
pub struct DefaultFactory<T> {
    cache: RwLock<HashMap<String, Arc<dyn MatrixMultiplier<T>>>>,
    exact_estimates: bool,
}

impl<T: Scalar> DefaultFactory<T> {
    /// Create a new default factory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
            exact_estimates: false,
        }
    }

    /// Declare the exact leaf count as the progress maximum instead of the placeholder.
    #[must_use]
    pub fn with_exact_estimates(mut self) -> Self {
        self.exact_estimates = true;
        self
    }

    fn engine(&self, policy: BlockPolicy<T>, branching: usize) -> Arc<dyn MatrixMultiplier<T>> {
        let engine = BlockEngine::new(policy);
        if self.exact_estimates {
            Arc::new(engine.with_predictor(branching_predictor(branching)))
        } else {
            Arc::new(engine)
        }
    }

    fn create_multiplier(&self, name: &str) -> Result<Arc<dyn MatrixMultiplier<T>>, BlockError> {
        match name {
            "direct" => Ok(Arc::new(DirectMultiplier::new())),
            "classical" => Ok(self.engine(BlockPolicy::classical(), CLASSICAL_BRANCHING)),
            "strassen" => Ok(self.engine(BlockPolicy::strassen(), STRASSEN_BRANCHING)),
            "winograd" => Ok(self.engine(BlockPolicy::winograd(), STRASSEN_BRANCHING)),
            _ => Err(BlockError::Config(format!("unknown multiplier: {name}"))),
        }
    }
}

impl<T: Scalar> Default for DefaultFactory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> MultiplierFactory<T> for DefaultFactory<T> {
    fn get(&self, name: &str) -> Result<Arc<dyn MatrixMultiplier<T>>, BlockError> {
        if let Some(multiplier) = self.cache.read().get(name) {
            return Ok(Arc::clone(multiplier));
        }

        let multiplier = self.create_multiplier(name)?;
        self.cache
            .write()
            .insert(name.to_string(), Arc::clone(&multiplier));
        Ok(multiplier)
    }

    fn available(&self) -> Vec<&str> {
        vec!["direct", "classical", "strassen", "winograd"]
    }
}
