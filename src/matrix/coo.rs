//! Coordinate-format triples
//!
//! A minimal coordinate container used as a construction input, as the
//! source operand of array-sparse assignment, and as an exchange format.
//! The compressed engine itself never operates on COO data beyond
//! converting it in and out.

use crate::error::{Result, SparseError};
use crate::scalar::Scalar;

/// A sparse matrix as parallel `(row, col, value)` arrays
#[derive(Debug, Clone)]
pub struct CooMatrix<T> {
    /// `(rows, cols)` of the matrix
    pub shape: (usize, usize),
    /// Row coordinate of each stored entry
    pub row: Vec<usize>,
    /// Column coordinate of each stored entry
    pub col: Vec<usize>,
    /// Stored values
    pub data: Vec<T>,
}

impl<T: Scalar> CooMatrix<T> {
    /// Creates a coordinate matrix, validating array lengths and bounds
    ///
    /// # Errors
    ///
    /// * `Dimension` if the three arrays disagree in length
    /// * `IndexRange` if a coordinate is out of bounds
    pub fn new(
        shape: (usize, usize),
        row: Vec<usize>,
        col: Vec<usize>,
        data: Vec<T>,
    ) -> Result<Self> {
        if row.len() != col.len() || row.len() != data.len() {
            return Err(SparseError::Dimension(
                "row, col and data should have the same size".to_string(),
            ));
        }
        for &r in &row {
            if r >= shape.0 {
                return Err(SparseError::index_above(r as isize, shape.0));
            }
        }
        for &c in &col {
            if c >= shape.1 {
                return Err(SparseError::index_above(c as isize, shape.1));
            }
        }

        Ok(Self {
            shape,
            row,
            col,
            data,
        })
    }

    /// Returns the number of stored entries
    pub fn nnz(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_lengths() {
        let err = CooMatrix::new((2, 2), vec![0], vec![0, 1], vec![1.0]).unwrap_err();
        assert!(matches!(err, SparseError::Dimension(_)));
    }

    #[test]
    fn test_new_validates_bounds() {
        let err = CooMatrix::new((2, 2), vec![0], vec![3], vec![1.0]).unwrap_err();
        assert!(matches!(err, SparseError::IndexRange { .. }));
    }
}
