//! Element-wise arithmetic on compressed matrices
//!
//! Sparse-sparse addition and subtraction canonicalize both operands and
//! delegate the combination to sprs; the result comes back in the left
//! operand's format. Scalar addition is only defined for the zero scalar,
//! because a nonzero scalar would densify the matrix.

use ndarray::Array2;
use num_traits::Num;
use std::ops::Neg;

use crate::error::{Result, SparseError};
use crate::matrix::CompressedMatrix;
use crate::scalar::Scalar;
use crate::utils::{from_sprs, to_sprs};

impl<T> CompressedMatrix<T>
where
    T: Scalar + Num + Neg<Output = T> + Default,
    for<'r> &'r T: std::ops::Add<&'r T, Output = T>,
{
    /// Returns the element-wise negation, preserving the structure
    pub fn neg(&self) -> Self {
        let data = self.data().iter().map(|&v| -v).collect();

        Self::from_parts_trusted(
            self.format(),
            self.shape(),
            data,
            self.indices().to_vec(),
            self.indptr().to_vec(),
            self.sorted.clone(),
            self.canonical.clone(),
        )
    }

    /// Adds another sparse matrix element-wise, returning the sum in
    /// `self`'s format.
    ///
    /// # Errors
    ///
    /// `Shape` if the shapes disagree.
    pub fn add_sparse(&self, other: &Self) -> Result<Self> {
        if self.shape() != other.shape() {
            return Err(SparseError::Shape(format!(
                "inconsistent shapes: ({}, {}) and ({}, {})",
                self.shape().0,
                self.shape().1,
                other.shape().0,
                other.shape().1
            )));
        }

        // sprs addition needs both operands in the same storage order
        let aligned;
        let rhs = if other.format() == self.format() {
            other
        } else {
            aligned = other.to_format(self.format());
            &aligned
        };

        let sum = &to_sprs(self) + &to_sprs(rhs);
        Ok(from_sprs(sum, self.format()))
    }

    /// Subtracts another sparse matrix element-wise.
    ///
    /// # Errors
    ///
    /// `Shape` if the shapes disagree.
    pub fn sub_sparse(&self, other: &Self) -> Result<Self> {
        self.add_sparse(&other.neg())
    }

    /// Adds a scalar to every element.
    ///
    /// Only the zero scalar is supported, returning a copy; a nonzero
    /// scalar would turn every implicit zero into a stored entry.
    ///
    /// # Errors
    ///
    /// `UnsupportedOperation` for nonzero scalars.
    pub fn add_scalar(&self, scalar: T) -> Result<Self> {
        if scalar.is_zero() {
            return Ok(self.clone());
        }

        Err(SparseError::UnsupportedOperation(
            "adding a nonzero scalar to a sparse matrix is not supported".to_string(),
        ))
    }

    /// Subtracts a scalar from every element; see
    /// [`add_scalar`](Self::add_scalar)
    pub fn sub_scalar(&self, scalar: T) -> Result<Self> {
        self.add_scalar(-scalar)
    }

    /// Adds a dense array element-wise, producing a dense result.
    ///
    /// # Errors
    ///
    /// `Shape` if the shapes disagree.
    pub fn add_dense(&self, dense: &Array2<T>) -> Result<Array2<T>> {
        if self.shape() != dense.dim() {
            return Err(SparseError::Shape(format!(
                "inconsistent shapes: ({}, {}) and ({}, {})",
                self.shape().0,
                self.shape().1,
                dense.dim().0,
                dense.dim().1
            )));
        }

        let mut out = dense.clone();
        for r in 0..self.major_dim() {
            for (m, &value) in self.major_iter(r) {
                let (i, j) = self.format().swap(r, m);
                out[[i, j]] = out[[i, j]] + value;
            }
        }

        Ok(out)
    }
}
