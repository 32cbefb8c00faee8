//! Slicing along the major and minor axes
//!
//! A unit-step major slice is the cheap primitive: the sliced `indptr` is a
//! contiguous sub-range rebased to zero and the entry arrays are copied in
//! one block. Every other case (non-unit or negative steps) materializes
//! its index sequence and falls back to fancy indexing, and minor slicing
//! filters each lane's stored positions against the slice bounds.

use rayon::prelude::*;

use crate::error::{Result, SparseError};
use crate::matrix::CompressedMatrix;
use crate::scalar::Scalar;
use crate::utils::exclusive_scan;

/// A half-open, stepped index range over one axis.
///
/// Negative `start`/`stop` count from the end of the axis and either bound
/// is clamped, so any slice is valid against any axis length (it may just
/// select nothing).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    /// First selected position (may be negative: counts from the end)
    pub start: isize,
    /// Exclusive stop position (may be negative: counts from the end)
    pub stop: isize,
    /// Step between selected positions; must be nonzero, may be negative
    pub step: isize,
}

impl Slice {
    /// Creates a slice with the given bounds and step
    pub fn new(start: isize, stop: isize, step: isize) -> Self {
        Slice { start, stop, step }
    }

    /// The slice selecting an entire axis of length `dim`
    pub fn full(dim: usize) -> Self {
        Slice {
            start: 0,
            stop: dim as isize,
            step: 1,
        }
    }

    /// Normalizes the bounds against an axis of length `dim`, yielding
    /// `(start, stop, step)` with both bounds clamped into range
    pub(crate) fn resolve(&self, dim: usize) -> (isize, isize, isize) {
        let dim = dim as isize;
        let step = self.step;

        let clamp = |mut bound: isize| -> isize {
            if bound < 0 {
                bound += dim;
                if bound < 0 {
                    bound = if step < 0 { -1 } else { 0 };
                }
            } else if bound >= dim {
                bound = if step < 0 { dim - 1 } else { dim };
            }
            bound
        };

        (clamp(self.start), clamp(self.stop), step)
    }

    /// Number of positions the slice selects on an axis of length `dim`
    pub(crate) fn len(&self, dim: usize) -> usize {
        let (start, stop, step) = self.resolve(dim);
        if step > 0 {
            if stop > start {
                ((stop - start + step - 1) / step) as usize
            } else {
                0
            }
        } else {
            if stop < start {
                ((stop - start + step + 1) / step) as usize
            } else {
                0
            }
        }
    }

    /// Materializes the selected positions
    pub(crate) fn positions(&self, dim: usize) -> Vec<usize> {
        let (start, stop, step) = self.resolve(dim);
        let mut out = Vec::with_capacity(self.len(dim));
        let mut k = start;

        if step > 0 {
            while k < stop {
                out.push(k as usize);
                k += step;
            }
        } else {
            while k > stop {
                out.push(k as usize);
                k += step;
            }
        }

        out
    }

    fn check_step(&self) -> Result<()> {
        if self.step == 0 {
            return Err(SparseError::UnsupportedOperation(
                "slice step cannot be zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl<T: Scalar> CompressedMatrix<T> {
    /// Extracts the sub-matrix selected by a row slice and a column slice
    pub fn get_slice(&self, rows: Slice, cols: Slice) -> Result<Self> {
        let (major, minor) = self.format.swap(rows, cols);
        self.major_slice(major)?.minor_slice(minor)
    }

    /// Slices along the major axis.
    ///
    /// Unit-step slices run in O(selected lanes) pointer work plus one copy
    /// of the selected entries; other steps fall back to
    /// [`major_index_fancy`](Self::major_index_fancy).
    pub fn major_slice(&self, idx: Slice) -> Result<Self> {
        idx.check_step()?;
        let m = self.major_dim();
        let n = self.minor_dim();
        let (start, stop, step) = idx.resolve(m);

        if start == 0 && stop == m as isize && step == 1 {
            return Ok(self.clone());
        }

        let new_major = idx.len(m);
        let new_shape = {
            let (r, c) = self.format.swap(new_major, n);
            (r, c)
        };

        if step == 1 {
            if new_major == 0 || self.nnz() == 0 {
                return Ok(Self::empty(self.format, new_shape));
            }

            let (start, stop) = (start as usize, stop as usize);
            let lo = self.indptr[start];
            let hi = self.indptr[stop];

            // Rebase the pointer sub-range to zero
            let indptr: Vec<usize> = self.indptr[start..=stop].iter().map(|&p| p - lo).collect();
            let indices = self.indices[lo..hi].to_vec();
            let data = self.data[lo..hi].to_vec();

            // Lane contents are copied verbatim, so per-lane flags carry over
            return Ok(Self::from_parts_trusted(
                self.format,
                new_shape,
                data,
                indices,
                indptr,
                self.sorted.clone(),
                self.canonical.clone(),
            ));
        }

        let lanes = idx.positions(m);
        self.major_index_fancy(&lanes)
    }

    /// Slices along the minor axis.
    ///
    /// Unit-step slices filter each lane's stored positions against the
    /// bounds in parallel; other steps fall back to
    /// [`minor_index_fancy`](Self::minor_index_fancy).
    pub fn minor_slice(&self, idx: Slice) -> Result<Self> {
        idx.check_step()?;
        let m = self.major_dim();
        let n = self.minor_dim();
        let (start, stop, step) = idx.resolve(n);

        if start == 0 && stop == n as isize && step == 1 {
            return Ok(self.clone());
        }

        let new_minor = idx.len(n);
        let new_shape = {
            let (r, c) = self.format.swap(m, new_minor);
            (r, c)
        };

        if new_minor == 0 || self.nnz() == 0 {
            return Ok(Self::empty(self.format, new_shape));
        }

        if step == 1 {
            let (start, stop) = (start as usize, stop as usize);

            // Filter each lane independently, then assemble
            let lane_results: Vec<(Vec<usize>, Vec<T>)> = (0..m)
                .into_par_iter()
                .map(|r| {
                    let mut minors = Vec::new();
                    let mut values = Vec::new();
                    for (j, &value) in self.major_iter(r) {
                        if j >= start && j < stop {
                            minors.push(j - start);
                            values.push(value);
                        }
                    }
                    (minors, values)
                })
                .collect();

            let counts: Vec<usize> = lane_results.iter().map(|(m, _)| m.len()).collect();
            let indptr = exclusive_scan(&counts);

            let mut indices = Vec::with_capacity(indptr[m]);
            let mut data = Vec::with_capacity(indptr[m]);
            for (minors, values) in lane_results {
                indices.extend(minors);
                data.extend(values);
            }

            // Filtering preserves entry order within each lane
            return Ok(Self::from_parts_trusted(
                self.format,
                new_shape,
                data,
                indices,
                indptr,
                self.sorted.clone(),
                self.canonical.clone(),
            ));
        }

        let positions = idx.positions(n);
        self.minor_index_fancy(&positions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::Format;
    use ndarray::array;

    fn sample_csr() -> CompressedMatrix<f64> {
        // [1 0 2 0]
        // [0 3 0 4]
        // [5 0 0 6]
        CompressedMatrix::from_parts(
            Format::Csr,
            (3, 4),
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            vec![0, 2, 1, 3, 0, 3],
            vec![0, 2, 4, 6],
        )
        .unwrap()
    }

    #[test]
    fn test_slice_len_and_positions() {
        let s = Slice::new(1, 7, 2);
        assert_eq!(s.len(10), 3);
        assert_eq!(s.positions(10), vec![1, 3, 5]);

        let descending = Slice::new(4, 0, -2);
        assert_eq!(descending.positions(5), vec![4, 2]);

        let negative_bounds = Slice::new(-3, -1, 1);
        assert_eq!(negative_bounds.positions(5), vec![2, 3]);

        let empty = Slice::new(3, 3, 1);
        assert_eq!(empty.len(5), 0);
    }

    #[test]
    fn test_major_slice_unit_step() {
        let sliced = sample_csr().major_slice(Slice::new(1, 3, 1)).unwrap();

        assert_eq!(sliced.shape(), (2, 4));
        assert_eq!(sliced.indptr(), &[0, 2, 4]);
        assert_eq!(
            sliced.to_dense(),
            array![[0.0, 3.0, 0.0, 4.0], [5.0, 0.0, 0.0, 6.0]]
        );
    }

    #[test]
    fn test_major_slice_with_step() {
        let sliced = sample_csr().major_slice(Slice::new(0, 3, 2)).unwrap();

        assert_eq!(sliced.shape(), (2, 4));
        assert_eq!(
            sliced.to_dense(),
            array![[1.0, 0.0, 2.0, 0.0], [5.0, 0.0, 0.0, 6.0]]
        );
    }

    #[test]
    fn test_minor_slice_unit_step() {
        let sliced = sample_csr().minor_slice(Slice::new(1, 4, 1)).unwrap();

        assert_eq!(sliced.shape(), (3, 3));
        assert_eq!(
            sliced.to_dense(),
            array![[0.0, 2.0, 0.0], [3.0, 0.0, 4.0], [0.0, 0.0, 6.0]]
        );
    }

    #[test]
    fn test_combined_slice_on_csc() {
        let csc = sample_csr().to_format(Format::Csc);
        let sliced = csc
            .get_slice(Slice::new(0, 2, 1), Slice::new(1, 4, 1))
            .unwrap();

        assert_eq!(sliced.format(), Format::Csc);
        assert_eq!(sliced.to_dense(), array![[0.0, 2.0, 0.0], [3.0, 0.0, 4.0]]);
    }

    #[test]
    fn test_full_slice_returns_copy() {
        let matrix = sample_csr();
        let copy = matrix.major_slice(Slice::full(3)).unwrap();

        assert_eq!(copy.to_dense(), matrix.to_dense());
    }

    #[test]
    fn test_zero_step_rejected() {
        let err = sample_csr().major_slice(Slice::new(0, 3, 0)).unwrap_err();
        assert!(matches!(err, SparseError::UnsupportedOperation(_)));
    }

    #[test]
    fn test_reversed_major_slice() {
        let sliced = sample_csr().major_slice(Slice::new(2, -4, -1)).unwrap();

        assert_eq!(
            sliced.to_dense(),
            array![
                [5.0, 0.0, 0.0, 6.0],
                [0.0, 3.0, 0.0, 4.0],
                [1.0, 0.0, 2.0, 0.0]
            ]
        );
    }
}
