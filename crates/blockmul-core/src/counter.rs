//! Shared operation counter.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Atomically updated counter shared by every participant of one top-level call.
///
/// Clones share the same underlying value, so a clone handed to a worker
/// increments the caller's counter.
///
/// # Example
/// ```
/// use blockmul_core::counter::OpCounter;
///
/// let counter = OpCounter::new();
/// let worker_view = counter.clone();
/// worker_view.increment(3);
/// assert_eq!(counter.read(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct OpCounter {
    value: Arc<AtomicU64>,
}

impl OpCounter {
    /// Create a counter starting at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            value: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Add `amount` to the counter.
    pub fn increment(&self, amount: u64) {
        self.value.fetch_add(amount, Ordering::AcqRel);
    }

    /// Read the current value.
    #[must_use]
    pub fn read(&self) -> u64 {
        self.value.load(Ordering::Acquire)
    }
}
