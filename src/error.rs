//! Error types for spindex

use crate::scalar::DType;
use thiserror::Error;

/// Result type alias using spindex's SparseError
pub type Result<T> = std::result::Result<T, SparseError>;

/// Errors that can occur when constructing or operating on compressed
/// sparse matrices.
///
/// All variants are raised synchronously by the call that detects them;
/// nothing is retried internally. A failed bounds check aborts the whole
/// batch operation before any write takes place.
#[derive(Error, Debug)]
pub enum SparseError {
    /// Malformed shape, or `indptr` disagreeing with the major dimension
    #[error("{0}")]
    Shape(String),

    /// Coordinate array shapes disagree, or an array is not the required length
    #[error("{0}")]
    Dimension(String),

    /// Coordinate outside `[-bound, bound)`
    #[error("index ({index}) out of range ({relation} {bound})")]
    IndexRange {
        /// The offending index value
        index: isize,
        /// `">="` for indices at or above the bound, `"< -"` for indices below it
        relation: &'static str,
        /// The violated bound
        bound: usize,
    },

    /// Scalar type outside the supported set for this operation
    #[error("unsupported dtype {dtype:?} for operation '{op}'")]
    UnsupportedType {
        /// The unsupported dtype
        dtype: DType,
        /// The operation name
        op: &'static str,
    },

    /// Operation that the compressed formats do not define
    #[error("{0}")]
    UnsupportedOperation(String),
}

impl SparseError {
    /// Shape error for an `indptr` whose length disagrees with the major dimension
    pub(crate) fn indptr_size(got: usize, expected: usize) -> Self {
        SparseError::Shape(format!(
            "index pointer size ({}) should be ({})",
            got, expected
        ))
    }

    /// Index at or above its upper bound
    pub(crate) fn index_above(index: isize, bound: usize) -> Self {
        SparseError::IndexRange {
            index,
            relation: ">=",
            bound,
        }
    }

    /// Index below the negative of its bound
    pub(crate) fn index_below(index: isize, bound: usize) -> Self {
        SparseError::IndexRange {
            index,
            relation: "< -",
            bound,
        }
    }
}
