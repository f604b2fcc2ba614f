//! Application entry point and dispatch.

use anyhow::{Context, Result};
use tracing::debug;

use blockmul_cli::output::write_matrix_json;
use blockmul_cli::presenter::{CLIProgressReporter, CLIResultPresenter};
use blockmul_cli::ui::print_success;
use blockmul_core::registry::DefaultFactory;
use blockmul_orchestration::interfaces::{NullProgressReporter, ProgressReporter, ResultPresenter};
use blockmul_orchestration::orchestrator::{
    analyze_comparison_results, execute_products, DEFAULT_RELATIVE_TOLERANCE,
};
use blockmul_orchestration::selection::get_multipliers_to_run;

use crate::config::AppConfig;
use crate::input::{generate_operands, load_operands};

/// Run the application.
pub fn run(config: &AppConfig) -> Result<()> {
    // Handle shell completion
    if let Some(shell) = config.completion {
        let mut cmd = <AppConfig as clap::CommandFactory>::command();
        blockmul_cli::completion::generate_completion(&mut cmd, shell, &mut std::io::stdout());
        return Ok(());
    }

    run_cli(config)
}

fn run_cli(config: &AppConfig) -> Result<()> {
    let opts = config.options()?;

    let (a, b) = match &config.input {
        Some(path) => load_operands(path)?,
        None => generate_operands(config.size),
    };
    debug!(rows = a.nrows(), cols = a.ncols(), algo = %config.algo, "operands ready");

    let factory = if config.exact_estimate {
        DefaultFactory::<f64>::new().with_exact_estimates()
    } else {
        DefaultFactory::<f64>::new()
    };
    let multipliers = get_multipliers_to_run(&config.algo, &factory)?;

    let reporter: Box<dyn ProgressReporter> = if config.progress && !config.quiet {
        Box::new(CLIProgressReporter::new(false))
    } else {
        Box::new(NullProgressReporter)
    };
    let results = execute_products(&multipliers, &a, &b, &opts, reporter.as_ref());

    // Present the first product in full, then the comparison table
    let presenter = CLIResultPresenter::new(config.verbose, config.quiet);
    let first_ok = results.iter().find(|r| r.is_ok());
    if let Some(result) = first_ok {
        presenter.present_result(result, a.nrows(), config.details);
    }
    for result in results.iter().filter(|r| !r.is_ok()) {
        if let Err(e) = &result.outcome {
            presenter.present_error(&format!("{}: {e}", result.algorithm));
        }
    }
    if results.len() > 1 {
        presenter.present_comparison(&results);
    }

    // Write to file if requested
    if let (Some(path), Some(result)) = (&config.output, first_ok) {
        if let Ok(product) = &result.outcome {
            write_matrix_json(path, &product.matrix)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
    }

    if let Some(Err(e)) = results.iter().map(|r| &r.outcome).find(|o| o.is_err()) {
        return Err(e.clone().into());
    }
    analyze_comparison_results(&results, DEFAULT_RELATIVE_TOLERANCE)?;
    if results.len() > 1 && !config.quiet {
        print_success(&format!("all {} products agree", results.len()));
    }
    Ok(())
}
