//! Dense matrix helpers: padding, quadrant partitions, reassembly and
//! checked linear combinations of equally shaped blocks.

use std::fmt::Debug;

use ndarray::{s, Array2, ArrayView2, Axis, Zip};

use crate::error::BlockError;

/// Element type accepted by the engine.
///
/// Any `ndarray` linear-algebra scalar that can cross thread boundaries.
pub trait Scalar: ndarray::LinalgScalar + Send + Sync + Debug {}

impl<T> Scalar for T where T: ndarray::LinalgScalar + Send + Sync + Debug {}

/// Smallest power of two greater than or equal to `x` (1 for 0).
#[must_use]
pub fn next_power_of_two(x: usize) -> usize {
    x.max(1).next_power_of_two()
}

/// Human readable `rows x cols` shape.
#[must_use]
pub fn shape_of<T>(m: &ArrayView2<'_, T>) -> String {
    format!("{}x{}", m.nrows(), m.ncols())
}

/// Check that both operands are square and identically shaped.
pub fn validate_operands<T>(a: &Array2<T>, b: &Array2<T>) -> Result<(), BlockError> {
    if a.nrows() != a.ncols() {
        return Err(BlockError::InvalidInput(format!(
            "left operand must be square, got {}",
            shape_of(&a.view())
        )));
    }
    if a.dim() != b.dim() {
        return Err(BlockError::InvalidInput(format!(
            "operands must have the same shape, got {} and {}",
            shape_of(&a.view()),
            shape_of(&b.view())
        )));
    }
    Ok(())
}

/// Zero-pad `m` on the bottom and right to `size x size`.
///
/// Returns `m` unchanged when it already has that shape.
pub fn pad_to<T: Scalar>(m: Array2<T>, size: usize) -> Result<Array2<T>, BlockError> {
    let (rows, cols) = m.dim();
    if rows > size || cols > size {
        return Err(BlockError::Shape(format!(
            "cannot pad {rows}x{cols} block down to {size}x{size}"
        )));
    }
    if rows == size && cols == size {
        return Ok(m);
    }
    let mut padded = Array2::zeros((size, size));
    padded.slice_mut(s![..rows, ..cols]).assign(&m);
    Ok(padded)
}

/// Drop padding rows and columns beyond `rows x cols`.
#[must_use]
pub fn truncate<T: Scalar>(m: Array2<T>, rows: usize, cols: usize) -> Array2<T> {
    if m.dim() == (rows, cols) {
        return m;
    }
    m.slice(s![..rows, ..cols]).to_owned()
}

/// The four quadrants of an even-sized square matrix.
#[derive(Debug, Clone)]
pub struct QuadrantGrid<T> {
    quads: [[Array2<T>; 2]; 2],
}

impl<T: Scalar> QuadrantGrid<T> {
    /// Split a square matrix of even size into its quadrants.
    pub fn split(m: &Array2<T>) -> Result<Self, BlockError> {
        let (rows, cols) = m.dim();
        if rows != cols || rows % 2 != 0 {
            return Err(BlockError::Shape(format!(
                "cannot split {rows}x{cols} block into quadrants"
            )));
        }
        let mid = rows / 2;
        Ok(Self {
            quads: [
                [
                    m.slice(s![..mid, ..mid]).to_owned(),
                    m.slice(s![..mid, mid..]).to_owned(),
                ],
                [
                    m.slice(s![mid.., ..mid]).to_owned(),
                    m.slice(s![mid.., mid..]).to_owned(),
                ],
            ],
        })
    }

    /// Quadrant at `(row, col)`, each in `0..2`.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> &Array2<T> {
        &self.quads[row][col]
    }

    /// Top-left quadrant.
    #[must_use]
    pub fn q11(&self) -> &Array2<T> {
        &self.quads[0][0]
    }

    /// Top-right quadrant.
    #[must_use]
    pub fn q12(&self) -> &Array2<T> {
        &self.quads[0][1]
    }

    /// Bottom-left quadrant.
    #[must_use]
    pub fn q21(&self) -> &Array2<T> {
        &self.quads[1][0]
    }

    /// Bottom-right quadrant.
    #[must_use]
    pub fn q22(&self) -> &Array2<T> {
        &self.quads[1][1]
    }

    /// Side length of each quadrant.
    #[must_use]
    pub fn half(&self) -> usize {
        self.quads[0][0].nrows()
    }
}

/// Stitch four `half x half` quadrants back into one matrix.
pub fn assemble<T: Scalar>(quads: [[Array2<T>; 2]; 2], half: usize) -> Result<Array2<T>, BlockError> {
    for (i, row) in quads.iter().enumerate() {
        for (j, q) in row.iter().enumerate() {
            if q.dim() != (half, half) {
                return Err(BlockError::Shape(format!(
                    "quadrant ({i}, {j}) is {}, expected {half}x{half}",
                    shape_of(&q.view())
                )));
            }
        }
    }
    let [[c11, c12], [c21, c22]] = quads;
    let top = ndarray::concatenate(Axis(1), &[c11.view(), c12.view()])?;
    let bottom = ndarray::concatenate(Axis(1), &[c21.view(), c22.view()])?;
    Ok(ndarray::concatenate(Axis(0), &[top.view(), bottom.view()])?)
}

/// One signed operand of a linear combination.
#[derive(Debug, Clone, Copy)]
pub enum Term<'a, T> {
    Plus(&'a Array2<T>),
    Minus(&'a Array2<T>),
}

impl<'a, T> Term<'a, T> {
    fn matrix(&self) -> &'a Array2<T> {
        match *self {
            Term::Plus(m) | Term::Minus(m) => m,
        }
    }
}

/// Evaluate a signed sum of equally shaped matrices.
///
/// Shapes are checked so a malformed policy surfaces as an error rather than
/// a broadcasting panic.
pub fn combine<T: Scalar>(terms: &[Term<'_, T>]) -> Result<Array2<T>, BlockError> {
    let first = terms
        .first()
        .ok_or_else(|| BlockError::Policy("empty linear combination".into()))?;
    let dim = first.matrix().dim();
    let mut acc = Array2::<T>::zeros(dim);
    for term in terms {
        let m = term.matrix();
        if m.dim() != dim {
            return Err(BlockError::Shape(format!(
                "cannot combine {} with {}x{}",
                shape_of(&m.view()),
                dim.0,
                dim.1
            )));
        }
        match term {
            Term::Plus(_) => Zip::from(&mut acc).and(m).for_each(|a, &b| *a = *a + b),
            Term::Minus(_) => Zip::from(&mut acc).and(m).for_each(|a, &b| *a = *a - b),
        }
    }
    Ok(acc)
}
