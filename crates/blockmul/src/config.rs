//! Application configuration from CLI flags and environment.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use blockmul_core::constants::{DEFAULT_MAX_PARALLEL_DEPTH, DEFAULT_THRESHOLD};
use blockmul_core::error::BlockError;
use blockmul_core::options::Options;

/// blockmul: recursive block matrix multiplication with nested parallel fan-out.
#[derive(Parser, Debug)]
#[command(name = "blockmul", version, about)]
#[allow(clippy::struct_excessive_bools)]
pub struct AppConfig {
    /// Side of the generated square operands (ignored with --input).
    #[arg(short = 'n', long, default_value_t = 8, env = "BLOCKMUL_SIZE")]
    pub size: usize,

    /// Algorithm to use: direct, classical, strassen, winograd, or all.
    #[arg(long, default_value = "all")]
    pub algo: String,

    /// Block size at or below which blocks are multiplied directly.
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: usize,

    /// Number of recursion levels that fan out in parallel.
    #[arg(long, default_value_t = DEFAULT_MAX_PARALLEL_DEPTH)]
    pub depth: usize,

    /// Worker threads per fan-out pool (0 = default).
    #[arg(long, default_value_t = 0)]
    pub workers: usize,

    /// JSON file holding the operands as {"a": [[...]], "b": [[...]]}.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Write the product to this file as a JSON array of rows.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Show a progress bar per algorithm.
    #[arg(long)]
    pub progress: bool,

    /// Report the number of direct multiplications.
    #[arg(short, long)]
    pub count: bool,

    /// Use the exact leaf count as the progress maximum.
    #[arg(long)]
    pub exact_estimate: bool,

    /// Delay between progress samples (e.g., "10ms", "1s").
    #[arg(long, default_value = "10ms")]
    pub sample_interval: String,

    /// Verbose output (print whole matrices).
    #[arg(short, long)]
    pub verbose: bool,

    /// Show detailed execution statistics.
    #[arg(short, long)]
    pub details: bool,

    /// Quiet mode (only output the product).
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate shell completion.
    #[arg(long, value_enum)]
    pub completion: Option<clap_complete::Shell>,
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Build the multiplication options from the flags.
    pub fn options(&self) -> Result<Options, BlockError> {
        let sample_interval = parse_duration(&self.sample_interval).ok_or_else(|| {
            BlockError::Config(format!("invalid sample interval: {}", self.sample_interval))
        })?;
        let opts = Options {
            threshold: self.threshold,
            max_parallel_depth: self.depth,
            pool_workers: self.workers,
            sample_interval,
            report_progress: self.progress,
            return_count: self.count,
        }
        .normalize();
        opts.validate()?;
        Ok(opts)
    }
}

/// Parse a duration string like "10ms", "2s", "1m".
fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(ms) = s.strip_suffix("ms") {
        let n: u64 = ms.parse().ok()?;
        Some(Duration::from_millis(n))
    } else if let Some(secs) = s.strip_suffix('s') {
        let n: u64 = secs.parse().ok()?;
        Some(Duration::from_secs(n))
    } else if let Some(mins) = s.strip_suffix('m') {
        let n: u64 = mins.parse().ok()?;
        Some(Duration::from_secs(n.checked_mul(60)?))
    } else {
        let n: u64 = s.parse().ok()?;
        Some(Duration::from_millis(n))
    }
}
