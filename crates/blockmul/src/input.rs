//! Operand loading and generation.

use std::path::Path;

use anyhow::{Context, Result};
use ndarray::Array2;
use serde::Deserialize;

use blockmul_core::error::BlockError;

/// On-disk operand pair.
#[derive(Debug, Deserialize)]
struct OperandFile {
    a: Vec<Vec<f64>>,
    b: Vec<Vec<f64>>,
}

/// Build a matrix from nested rows, rejecting ragged input.
pub fn rows_to_matrix(rows: Vec<Vec<f64>>) -> Result<Array2<f64>, BlockError> {
    let nrows = rows.len();
    let ncols = rows.first().map_or(0, Vec::len);
    if let Some(i) = rows.iter().position(|row| row.len() != ncols) {
        return Err(BlockError::InvalidInput(format!(
            "row {i} has {} entries, expected {ncols}",
            rows[i].len()
        )));
    }
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Ok(Array2::from_shape_vec((nrows, ncols), flat)?)
}

/// Load both operands from a JSON file.
pub fn load_operands(path: &Path) -> Result<(Array2<f64>, Array2<f64>)> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let file: OperandFile = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    let a = rows_to_matrix(file.a).context("operand a")?;
    let b = rows_to_matrix(file.b).context("operand b")?;
    Ok((a, b))
}

/// Deterministic integer-valued operands of the given size.
///
/// Entries are small integers, so every algorithm produces the exact product.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn generate_operands(size: usize) -> (Array2<f64>, Array2<f64>) {
    let a = Array2::from_shape_fn((size, size), |(i, j)| ((i * 7 + j * 3) % 11) as f64 - 5.0);
    let b = Array2::from_shape_fn((size, size), |(i, j)| ((i * 5 + j * 2) % 13) as f64 - 6.0);
    (a, b)
}
