//! Pluggable divide-and-conquer policies.
//!
//! A `BlockPolicy` pairs an ordered list of scatter targets (how to build the
//! operands of each recursive product from the quadrants of A and B) with a
//! 2x2 grid of gather tasks (how to rebuild each output quadrant from the
//! ordered recursive results). The engine never looks inside a policy, so the
//! classical method, Strassen's method and Winograd's variant share one
//! recursion.

use ndarray::Array2;

use crate::constants::{CLASSICAL_BRANCHING, STRASSEN_BRANCHING};
use crate::error::BlockError;
use crate::matrix::{assemble, combine, QuadrantGrid, Scalar, Term};

/// Builds one operand of a recursive product from the quadrants of A and B.
pub trait Decomposer<T>: Send + Sync {
    fn decompose(&self, a: &QuadrantGrid<T>, b: &QuadrantGrid<T>) -> Result<Array2<T>, BlockError>;
}

impl<T, F> Decomposer<T> for F
where
    F: Fn(&QuadrantGrid<T>, &QuadrantGrid<T>) -> Result<Array2<T>, BlockError> + Send + Sync,
{
    fn decompose(&self, a: &QuadrantGrid<T>, b: &QuadrantGrid<T>) -> Result<Array2<T>, BlockError> {
        self(a, b)
    }
}

/// Builds one output quadrant from the ordered recursive results.
pub trait Recombiner<T>: Send + Sync {
    fn recombine(&self, results: &[Array2<T>]) -> Result<Array2<T>, BlockError>;
}

impl<T, F> Recombiner<T> for F
where
    F: Fn(&[Array2<T>]) -> Result<Array2<T>, BlockError> + Send + Sync,
{
    fn recombine(&self, results: &[Array2<T>]) -> Result<Array2<T>, BlockError> {
        self(results)
    }
}

/// Left and right operand builders for one recursive product.
pub struct ScatterTarget<T> {
    left: Box<dyn Decomposer<T>>,
    right: Box<dyn Decomposer<T>>,
}

impl<T: Scalar> ScatterTarget<T> {
    /// Create a target from two operand-building closures.
    pub fn new<L, R>(left: L, right: R) -> Self
    where
        L: Fn(&QuadrantGrid<T>, &QuadrantGrid<T>) -> Result<Array2<T>, BlockError> + Send + Sync + 'static,
        R: Fn(&QuadrantGrid<T>, &QuadrantGrid<T>) -> Result<Array2<T>, BlockError> + Send + Sync + 'static,
    {
        Self::from_decomposers(Box::new(left), Box::new(right))
    }

    /// Create a target from boxed decomposers.
    pub fn from_decomposers(left: Box<dyn Decomposer<T>>, right: Box<dyn Decomposer<T>>) -> Self {
        Self { left, right }
    }

    /// Build the operand pair for this target.
    pub fn operands(
        &self,
        a: &QuadrantGrid<T>,
        b: &QuadrantGrid<T>,
    ) -> Result<(Array2<T>, Array2<T>), BlockError> {
        Ok((self.left.decompose(a, b)?, self.right.decompose(a, b)?))
    }
}

/// Gather tasks laid out as the output quadrants `[[c11, c12], [c21, c22]]`.
pub type GatherGrid<T> = [[Box<dyn Recombiner<T>>; 2]; 2];

/// A complete decomposition + recombination policy.
pub struct BlockPolicy<T> {
    name: String,
    scatter: Vec<ScatterTarget<T>>,
    gather: GatherGrid<T>,
}

impl<T: Scalar> BlockPolicy<T> {
    /// Create a policy from caller-supplied targets and gather tasks.
    ///
    /// Arity and shapes are not checked here; a malformed policy fails when it
    /// is first used.
    pub fn new(name: impl Into<String>, scatter: Vec<ScatterTarget<T>>, gather: GatherGrid<T>) -> Self {
        Self {
            name: name.into(),
            scatter,
            gather,
        }
    }

    /// Get the name of this policy.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of recursive products per level.
    #[must_use]
    pub fn branching(&self) -> usize {
        self.scatter.len()
    }

    /// Build the ordered operand pairs for every scatter target.
    pub fn scatter(
        &self,
        a: &QuadrantGrid<T>,
        b: &QuadrantGrid<T>,
    ) -> Result<Vec<(Array2<T>, Array2<T>)>, BlockError> {
        self.scatter.iter().map(|target| target.operands(a, b)).collect()
    }

    /// Rebuild a `2 * half` square product from the ordered recursive results.
    pub fn gather(&self, results: &[Array2<T>], half: usize) -> Result<Array2<T>, BlockError> {
        let [[g11, g12], [g21, g22]] = &self.gather;
        let quads = [
            [g11.recombine(results)?, g12.recombine(results)?],
            [g21.recombine(results)?, g22.recombine(results)?],
        ];
        assemble(quads, half)
    }

    /// Classical block method: eight products, each output quadrant a sum of two.
    #[must_use]
    pub fn classical() -> Self {
        let mut scatter = Vec::with_capacity(CLASSICAL_BRANCHING);
        for (row, col) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            for k in 0..2 {
                scatter.push(ScatterTarget::new(
                    move |a, _| Ok(a.get(row, k).clone()),
                    move |_, b| Ok(b.get(k, col).clone()),
                ));
            }
        }
        let gather: GatherGrid<T> = [
            [gather_sum(&[0, 1], &[]), gather_sum(&[2, 3], &[])],
            [gather_sum(&[4, 5], &[]), gather_sum(&[6, 7], &[])],
        ];
        Self::new("classical", scatter, gather)
    }

    /// Strassen's seven-product method.
    #[must_use]
    pub fn strassen() -> Self {
        let scatter = vec![
            // M1 = (A11 + A22)(B11 + B22)
            ScatterTarget::new(
                |a, _| combine(&[Term::Plus(a.q11()), Term::Plus(a.q22())]),
                |_, b| combine(&[Term::Plus(b.q11()), Term::Plus(b.q22())]),
            ),
            // M2 = (A21 + A22) B11
            ScatterTarget::new(
                |a, _| combine(&[Term::Plus(a.q21()), Term::Plus(a.q22())]),
                |_, b| Ok(b.q11().clone()),
            ),
            // M3 = A11 (B12 - B22)
            ScatterTarget::new(
                |a, _| Ok(a.q11().clone()),
                |_, b| combine(&[Term::Plus(b.q12()), Term::Minus(b.q22())]),
            ),
            // M4 = A22 (B21 - B11)
            ScatterTarget::new(
                |a, _| Ok(a.q22().clone()),
                |_, b| combine(&[Term::Plus(b.q21()), Term::Minus(b.q11())]),
            ),
            // M5 = (A11 + A12) B22
            ScatterTarget::new(
                |a, _| combine(&[Term::Plus(a.q11()), Term::Plus(a.q12())]),
                |_, b| Ok(b.q22().clone()),
            ),
            // M6 = (A21 - A11)(B11 + B12)
            ScatterTarget::new(
                |a, _| combine(&[Term::Plus(a.q21()), Term::Minus(a.q11())]),
                |_, b| combine(&[Term::Plus(b.q11()), Term::Plus(b.q12())]),
            ),
            // M7 = (A12 - A22)(B21 + B22)
            ScatterTarget::new(
                |a, _| combine(&[Term::Plus(a.q12()), Term::Minus(a.q22())]),
                |_, b| combine(&[Term::Plus(b.q21()), Term::Plus(b.q22())]),
            ),
        ];
        debug_assert_eq!(scatter.len(), STRASSEN_BRANCHING);
        let gather: GatherGrid<T> = [
            [
                gather_sum(&[0, 3, 6], &[4]),
                gather_sum(&[2, 4], &[]),
            ],
            [
                gather_sum(&[1, 3], &[]),
                gather_sum(&[0, 2, 5], &[1]),
            ],
        ];
        Self::new("strassen", scatter, gather)
    }

    /// Winograd's variant of Strassen: seven products with a different
    /// operand layout.
    #[must_use]
    pub fn winograd() -> Self {
        let scatter = vec![
            // P1 = A11 B11
            ScatterTarget::new(
                |a, _| Ok(a.q11().clone()),
                |_, b| Ok(b.q11().clone()),
            ),
            // P2 = A12 B21
            ScatterTarget::new(
                |a, _| Ok(a.q12().clone()),
                |_, b| Ok(b.q21().clone()),
            ),
            // P3 = (A11 + A12 - A21 - A22) B22
            ScatterTarget::new(
                |a, _| {
                    combine(&[
                        Term::Plus(a.q11()),
                        Term::Plus(a.q12()),
                        Term::Minus(a.q21()),
                        Term::Minus(a.q22()),
                    ])
                },
                |_, b| Ok(b.q22().clone()),
            ),
            // P4 = A22 (B11 - B12 - B21 + B22)
            ScatterTarget::new(
                |a, _| Ok(a.q22().clone()),
                |_, b| {
                    combine(&[
                        Term::Plus(b.q11()),
                        Term::Minus(b.q12()),
                        Term::Minus(b.q21()),
                        Term::Plus(b.q22()),
                    ])
                },
            ),
            // P5 = (A21 + A22)(B12 - B11)
            ScatterTarget::new(
                |a, _| combine(&[Term::Plus(a.q21()), Term::Plus(a.q22())]),
                |_, b| combine(&[Term::Plus(b.q12()), Term::Minus(b.q11())]),
            ),
            // P6 = (A21 + A22 - A11)(B11 - B12 + B22)
            ScatterTarget::new(
                |a, _| {
                    combine(&[Term::Plus(a.q21()), Term::Plus(a.q22()), Term::Minus(a.q11())])
                },
                |_, b| {
                    combine(&[Term::Plus(b.q11()), Term::Minus(b.q12()), Term::Plus(b.q22())])
                },
            ),
            // P7 = (A11 - A21)(B22 - B12)
            ScatterTarget::new(
                |a, _| combine(&[Term::Plus(a.q11()), Term::Minus(a.q21())]),
                |_, b| combine(&[Term::Plus(b.q22()), Term::Minus(b.q12())]),
            ),
        ];
        let gather: GatherGrid<T> = [
            [
                gather_sum(&[0, 1], &[]),
                gather_sum(&[0, 5, 4, 2], &[]),
            ],
            [
                gather_sum(&[0, 5, 6], &[3]),
                gather_sum(&[0, 5, 6, 4], &[]),
            ],
        ];
        Self::new("winograd", scatter, gather)
    }
}

/// Look up the recursive result at `index`.
pub fn result_at<T>(results: &[Array2<T>], index: usize) -> Result<&Array2<T>, BlockError> {
    results.get(index).ok_or_else(|| {
        BlockError::Policy(format!(
            "gather task needs result {index}, only {} available",
            results.len()
        ))
    })
}

/// Gather task computing `sum(results[plus]) - sum(results[minus])`.
pub fn gather_sum<T: Scalar>(plus: &[usize], minus: &[usize]) -> Box<dyn Recombiner<T>> {
    let plus = plus.to_vec();
    let minus = minus.to_vec();
    Box::new(move |results: &[Array2<T>]| -> Result<Array2<T>, BlockError> {
        let mut terms = Vec::with_capacity(plus.len() + minus.len());
        for &i in &plus {
            terms.push(Term::Plus(result_at(results, i)?));
        }
        for &i in &minus {
            terms.push(Term::Minus(result_at(results, i)?));
        }
        combine(&terms)
    })
}
