//! # blockmul-orchestration
//!
//! Multiplier selection, timed execution, and result analysis.

pub mod interfaces;
pub mod orchestrator;
pub mod selection;

pub use interfaces::{CalculationResult, NullProgressReporter, ProgressReporter, ResultPresenter};
pub use orchestrator::{analyze_comparison_results, execute_products, DEFAULT_RELATIVE_TOLERANCE};
pub use selection::get_multipliers_to_run;
