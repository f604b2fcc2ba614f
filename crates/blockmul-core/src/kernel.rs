//! Dense multiplication kernels.
//!
//! `DenseKernel` is the narrow interface the recursion calls once per leaf.
//! Every call is one counted direct multiplication.

use ndarray::{Array2, ArrayView2};

use crate::error::BlockError;
use crate::matrix::{shape_of, Scalar};

/// Narrow interface for the direct matrix product.
pub trait DenseKernel<T>: Send + Sync {
    /// Multiply two blocks whose inner dimensions agree.
    fn multiply(&self, a: ArrayView2<'_, T>, b: ArrayView2<'_, T>) -> Result<Array2<T>, BlockError>;

    /// Get the name of this kernel.
    fn name(&self) -> &str;
}

/// Kernel backed by `ndarray`'s general matrix product.
#[derive(Debug, Clone, Copy, Default)]
pub struct DotKernel;

impl DotKernel {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl<T: Scalar> DenseKernel<T> for DotKernel {
    fn multiply(&self, a: ArrayView2<'_, T>, b: ArrayView2<'_, T>) -> Result<Array2<T>, BlockError> {
        if a.ncols() != b.nrows() {
            return Err(BlockError::Shape(format!(
                "cannot multiply {} by {}",
                shape_of(&a),
                shape_of(&b)
            )));
        }
        Ok(a.dot(&b))
    }

    fn name(&self) -> &str {
        "dot"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn dot_kernel_multiplies() {
        let a = array![[1i64, 2], [3, 4]];
        let b = array![[5i64, 6], [7, 8]];
        let c = DotKernel::new().multiply(a.view(), b.view()).unwrap();
        assert_eq!(c, array![[19, 22], [43, 50]]);
    }

    #[test]
    fn dot_kernel_rejects_inner_mismatch() {
        let a = Array2::<f64>::zeros((2, 3));
        let b = Array2::<f64>::zeros((2, 2));
        let result = DotKernel::new().multiply(a.view(), b.view());
        assert!(matches!(result, Err(BlockError::Shape(_))));
    }

    #[test]
    fn dot_kernel_name() {
        assert_eq!(DenseKernel::<f64>::name(&DotKernel::new()), "dot");
    }
}
