//! Reduction engine: per-lane min/max and arg-min/arg-max
//!
//! Each reduction produces one output per major lane and runs the lanes in
//! parallel. The kernels operate on a float64 projection of the stored
//! values, so complex matrices are rejected up front.
//!
//! The implicit zeros matter: a lane with fewer stored entries than the
//! minor dimension contains at least one zero, and in all-positions mode
//! that zero competes with the stored values. Nonzero-only mode considers
//! stored values alone, so the max of a lane holding only negatives is
//! negative rather than zero. A NaN anywhere in a lane makes the lane's
//! reduction NaN.

use rayon::prelude::*;

use crate::error::{Result, SparseError};
use crate::matrix::CompressedMatrix;
use crate::scalar::Scalar;

/// Which extremum a reduction selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceKind {
    /// Select the smallest value
    Min,
    /// Select the largest value
    Max,
}

impl ReduceKind {
    /// Whether `candidate` beats the current `running` value
    fn better(self, running: f64, candidate: f64) -> bool {
        match self {
            ReduceKind::Min => candidate < running,
            ReduceKind::Max => candidate > running,
        }
    }
}

impl<T: Scalar> CompressedMatrix<T> {
    /// The float64 projection of the stored values.
    ///
    /// # Errors
    ///
    /// `UnsupportedType` for complex matrices, which have no such
    /// projection.
    fn real_data(&self, op: &'static str) -> Result<Vec<f64>> {
        if T::DTYPE.is_complex() {
            return Err(SparseError::UnsupportedType {
                dtype: T::DTYPE,
                op,
            });
        }

        Ok(self
            .data
            .iter()
            .map(|&v| v.to_real().unwrap_or(0.0))
            .collect())
    }

    /// Reduces every major lane to its extremum.
    ///
    /// With `nonzero` set, only stored values compete; otherwise any
    /// implicit zero in the lane competes too. An empty lane reduces to 0
    /// in both modes.
    ///
    /// # Errors
    ///
    /// `UnsupportedType` for complex matrices.
    pub fn reduce_major(&self, kind: ReduceKind, nonzero: bool) -> Result<Vec<f64>> {
        let op = match kind {
            ReduceKind::Min => "min",
            ReduceKind::Max => "max",
        };
        // Duplicates would distort both the density check and the values,
        // so reductions always see a canonical view
        let canonical_copy;
        let source = if self.has_canonical_format() {
            self
        } else {
            let mut copy = self.clone();
            copy.sum_duplicates();
            canonical_copy = copy;
            &canonical_copy
        };

        let real = source.real_data(op)?;
        let minor = source.minor_dim();

        let out = (0..source.major_dim())
            .into_par_iter()
            .map(|r| {
                let (start, end) = source.major_bounds(r);
                let lane_len = end - start;
                if lane_len == 0 {
                    return 0.0;
                }

                // A dense lane has no implicit zero, so the first stored
                // value seeds the accumulator; in nonzero-only mode it
                // always does
                let seeded = if nonzero {
                    true
                } else {
                    lane_len == minor
                };
                let mut running = if seeded { real[start] } else { 0.0 };

                for &value in &real[start..end] {
                    if value.is_nan() {
                        return f64::NAN;
                    }
                    if kind.better(running, value) {
                        running = value;
                    }
                }
                running
            })
            .collect();

        Ok(out)
    }

    /// Reduces every major lane to the minor position of its extremum.
    ///
    /// All positions compete, so a lane with implicit zeros seeds the
    /// result from the first unstored position (the smallest minor
    /// position holding a zero); ties then resolve toward that seed. A NaN
    /// in the lane reports position 0.
    ///
    /// # Errors
    ///
    /// `UnsupportedType` unless the matrix is `f32` or `f64`.
    pub fn arg_reduce_major(&self, kind: ReduceKind) -> Result<Vec<usize>> {
        let op = match kind {
            ReduceKind::Min => "argmin",
            ReduceKind::Max => "argmax",
        };
        if !T::DTYPE.is_float() {
            return Err(SparseError::UnsupportedType {
                dtype: T::DTYPE,
                op,
            });
        }

        // The zero-gap scan below reads each lane as a sorted duplicate-free
        // sequence of minor positions
        let canonical_copy;
        let source = if self.has_canonical_format() {
            self
        } else {
            let mut copy = self.clone();
            copy.sum_duplicates();
            canonical_copy = copy;
            &canonical_copy
        };

        let real = source.real_data(op)?;
        let minor = source.minor_dim();

        let out = (0..source.major_dim())
            .into_par_iter()
            .map(|r| {
                let (start, end) = source.major_bounds(r);
                let lane_len = end - start;
                if lane_len == 0 {
                    return 0;
                }

                let (mut running_value, mut running_index) = if lane_len == minor {
                    // Dense lane: the first stored value seeds
                    (real[start], 0)
                } else {
                    // Seed from the first unstored position: the first k
                    // where the sorted lane skips minor position k
                    let mut gap = lane_len;
                    for k in 0..lane_len {
                        if source.indices[start + k] != k {
                            gap = k;
                            break;
                        }
                    }
                    (0.0, gap)
                };

                for p in start..end {
                    let value = real[p];
                    if value.is_nan() {
                        return 0;
                    }
                    if kind.better(running_value, value) {
                        running_value = value;
                        running_index = source.indices[p];
                    }
                }
                running_index
            })
            .collect();

        Ok(out)
    }

    /// Maximum of each major lane; see [`reduce_major`](Self::reduce_major)
    pub fn major_max(&self, nonzero: bool) -> Result<Vec<f64>> {
        self.reduce_major(ReduceKind::Max, nonzero)
    }

    /// Minimum of each major lane; see [`reduce_major`](Self::reduce_major)
    pub fn major_min(&self, nonzero: bool) -> Result<Vec<f64>> {
        self.reduce_major(ReduceKind::Min, nonzero)
    }

    /// Minor position of each major lane's maximum; see
    /// [`arg_reduce_major`](Self::arg_reduce_major)
    pub fn major_argmax(&self) -> Result<Vec<usize>> {
        self.arg_reduce_major(ReduceKind::Max)
    }

    /// Minor position of each major lane's minimum; see
    /// [`arg_reduce_major`](Self::arg_reduce_major)
    pub fn major_argmin(&self) -> Result<Vec<usize>> {
        self.arg_reduce_major(ReduceKind::Min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::Format;
    use num_complex::Complex;

    fn sample_csr() -> CompressedMatrix<f64> {
        // [-1 0 -3]
        // [ 0 0  0]
        // [ 2 7  4]
        CompressedMatrix::from_parts(
            Format::Csr,
            (3, 3),
            vec![-1.0, -3.0, 2.0, 7.0, 4.0],
            vec![0, 2, 0, 1, 2],
            vec![0, 2, 2, 5],
        )
        .unwrap()
    }

    #[test]
    fn test_max_all_positions() {
        // Row 0 has an implicit zero, which beats both negatives
        let maxima = sample_csr().major_max(false).unwrap();
        assert_eq!(maxima, vec![0.0, 0.0, 7.0]);
    }

    #[test]
    fn test_max_nonzero_only() {
        // Only stored values compete: row 0's max is -1, not 0
        let maxima = sample_csr().major_max(true).unwrap();
        assert_eq!(maxima, vec![-1.0, 0.0, 7.0]);
    }

    #[test]
    fn test_min_all_positions() {
        let minima = sample_csr().major_min(false).unwrap();
        assert_eq!(minima, vec![-3.0, 0.0, 2.0]);
    }

    #[test]
    fn test_min_nonzero_only() {
        // Row 2 is dense and positive; its nonzero min is 2
        let minima = sample_csr().major_min(true).unwrap();
        assert_eq!(minima, vec![-3.0, 0.0, 2.0]);
    }

    #[test]
    fn test_nan_short_circuits() {
        let matrix = CompressedMatrix::from_parts(
            Format::Csr,
            (2, 2),
            vec![1.0, f64::NAN, 3.0],
            vec![0, 1, 0],
            vec![0, 2, 3],
        )
        .unwrap();

        let maxima = matrix.major_max(false).unwrap();
        assert!(maxima[0].is_nan());
        assert_eq!(maxima[1], 3.0);
    }

    #[test]
    fn test_argmax() {
        // Row 0: implicit zero at position 1 beats -1 and -3
        // Row 1: empty, reports 0
        // Row 2: dense, max 7 at position 1
        let positions = sample_csr().major_argmax().unwrap();
        assert_eq!(positions, vec![1, 0, 1]);
    }

    #[test]
    fn test_argmin() {
        let positions = sample_csr().major_argmin().unwrap();
        assert_eq!(positions, vec![2, 0, 0]);
    }

    #[test]
    fn test_argmax_seeds_first_gap() {
        // [5 0 0 8]: zeros at positions 1 and 2; argmin must report 1
        let matrix = CompressedMatrix::from_parts(
            Format::Csr,
            (1, 4),
            vec![5.0, 8.0],
            vec![0, 3],
            vec![0, 2],
        )
        .unwrap();

        assert_eq!(matrix.major_argmin().unwrap(), vec![1]);
        assert_eq!(matrix.major_argmax().unwrap(), vec![3]);
    }

    #[test]
    fn test_arg_reduce_nan_reports_zero() {
        let matrix = CompressedMatrix::from_parts(
            Format::Csr,
            (1, 3),
            vec![1.0, f64::NAN],
            vec![0, 2],
            vec![0, 2],
        )
        .unwrap();

        assert_eq!(matrix.major_argmax().unwrap(), vec![0]);
    }

    #[test]
    fn test_complex_reduction_rejected() {
        let matrix: CompressedMatrix<Complex<f64>> = CompressedMatrix::from_parts(
            Format::Csr,
            (1, 2),
            vec![Complex::new(1.0, 1.0)],
            vec![0],
            vec![0, 1],
        )
        .unwrap();

        assert!(matches!(
            matrix.major_max(false),
            Err(SparseError::UnsupportedType { .. })
        ));
        assert!(matches!(
            matrix.major_argmax(),
            Err(SparseError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn test_reduce_on_csc_reduces_columns() {
        let csc = sample_csr().to_format(Format::Csc);

        // Lanes of a CSC matrix are columns
        let maxima = csc.major_max(false).unwrap();
        assert_eq!(maxima, vec![2.0, 7.0, 4.0]);
    }
}
