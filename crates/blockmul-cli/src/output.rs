//! CLI output formatting.

use std::fmt::Write as _;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use ndarray::Array2;

/// Rows and columns shown before a matrix preview is elided.
pub const PREVIEW_EDGE: usize = 6;

/// Format a duration for display.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 0.001 {
        format!("{:.2}µs", secs * 1_000_000.0)
    } else if secs < 1.0 {
        format!("{:.2}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.3}s")
    } else {
        let mins = (secs / 60.0).floor() as u64;
        let remaining = secs - (mins as f64 * 60.0);
        format!("{mins}m{remaining:.1}s")
    }
}

/// Format a number with thousand separators.
#[must_use]
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a matrix for display, eliding rows and columns past [`PREVIEW_EDGE`]
/// unless `verbose` is set.
#[must_use]
pub fn format_matrix(m: &Array2<f64>, verbose: bool) -> String {
    let (rows, cols) = m.dim();
    let shown_rows = if verbose { rows } else { rows.min(PREVIEW_EDGE) };
    let shown_cols = if verbose { cols } else { cols.min(PREVIEW_EDGE) };

    let mut out = String::new();
    for i in 0..shown_rows {
        out.push_str("  [");
        for j in 0..shown_cols {
            if j > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "{:>10.4}", m[[i, j]]);
        }
        if shown_cols < cols {
            out.push_str(", ...");
        }
        out.push_str("]\n");
    }
    if shown_rows < rows {
        let _ = writeln!(out, "  ... ({rows}x{cols})");
    }
    out
}

/// Convert a matrix to nested rows for serialization.
#[must_use]
pub fn matrix_rows(m: &Array2<f64>) -> Vec<Vec<f64>> {
    m.rows().into_iter().map(|row| row.to_vec()).collect()
}

/// Write a matrix to a file as a JSON array of rows.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be created or written.
pub fn write_matrix_json(path: &Path, m: &Array2<f64>) -> io::Result<()> {
    let mut writer = BufWriter::new(std::fs::File::create(path)?);
    serde_json::to_writer(&mut writer, &matrix_rows(m))?;
    writer.flush()
}
