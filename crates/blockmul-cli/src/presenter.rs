//! CLI result presenter and progress reporter.

use std::sync::Arc;

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget};

use blockmul_core::observer::ProgressSink;
use blockmul_orchestration::interfaces::{CalculationResult, ProgressReporter, ResultPresenter};

use crate::output::{format_duration, format_matrix, format_number};
use crate::progress::IndicatifSink;
use crate::ui::{print_header, status_label};

/// CLI result presenter.
pub struct CLIResultPresenter {
    verbose: bool,
    quiet: bool,
}

impl CLIResultPresenter {
    #[must_use]
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }
}

impl ResultPresenter for CLIResultPresenter {
    fn present_result(&self, result: &CalculationResult<f64>, size: usize, details: bool) {
        let product = match &result.outcome {
            Ok(product) => product,
            Err(e) => {
                self.present_error(&format!("{}: {e}", result.algorithm));
                return;
            }
        };

        if self.quiet {
            print!("{}", format_matrix(&product.matrix, true));
            return;
        }

        println!("Algorithm: {}", result.algorithm);
        println!("Size: {size}x{size}");
        println!("Duration: {}", format_duration(result.duration));
        if let Some(count) = product.count {
            println!("Direct multiplications: {}", format_number(count));
        }

        if details {
            println!("Padded size: {}", product.stats.padded_size);
            println!("Parallel fan-outs: {}", format_number(product.stats.parallel_fanouts));
            println!(
                "Kernel calls: {}",
                format_number(product.stats.direct_multiplications)
            );
        }

        println!("C =");
        print!("{}", format_matrix(&product.matrix, self.verbose));
    }

    fn present_comparison(&self, results: &[CalculationResult<f64>]) {
        if self.quiet {
            return;
        }

        println!();
        print_header("Comparison Results");
        for result in results {
            let count = result
                .outcome
                .as_ref()
                .ok()
                .map_or_else(|| "-".to_string(), |p| format_number(p.stats.direct_multiplications));
            println!(
                "  {:<12} {:>12} {:>14} {}",
                result.algorithm,
                format_duration(result.duration),
                count,
                status_label(result.is_ok()),
            );
        }
    }

    fn present_error(&self, error: &str) {
        eprintln!("Error: {error}");
    }
}

/// Progress reporter drawing one bar per multiplier.
pub struct CLIProgressReporter {
    multi: MultiProgress,
}

impl CLIProgressReporter {
    /// Bars are drawn on stderr unless `hidden` is set.
    #[must_use]
    pub fn new(hidden: bool) -> Self {
        let target = if hidden {
            ProgressDrawTarget::hidden()
        } else {
            ProgressDrawTarget::stderr()
        };
        Self {
            multi: MultiProgress::with_draw_target(target),
        }
    }
}

impl ProgressReporter for CLIProgressReporter {
    fn sink_for(&self, _index: usize, algorithm: &str) -> Option<Arc<dyn ProgressSink>> {
        let bar = self.multi.add(ProgressBar::new(0));
        Some(Arc::new(IndicatifSink::new(bar, algorithm)))
    }

    fn complete(&self) {
        let _ = self.multi.clear();
    }
}
