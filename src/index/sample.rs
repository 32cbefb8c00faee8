//! Scalar and inner (coordinate-wise) lookups
//!
//! A lookup scans the stored entries of one major lane for a minor
//! position. When the matrix is known canonical the scan is a binary
//! search; otherwise it is a linear pass that sums duplicate entries, which
//! is the logical read value of a non-canonical matrix.

use rayon::prelude::*;

use crate::error::{Result, SparseError};
use crate::matrix::CompressedMatrix;
use crate::scalar::Scalar;

impl<T: Scalar> CompressedMatrix<T> {
    /// Returns the value at `(row, col)`, or zero if no entry is stored
    /// there.
    ///
    /// # Errors
    ///
    /// `IndexRange` if either coordinate is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        if row >= self.shape.0 {
            return Err(SparseError::index_above(row as isize, self.shape.0));
        }
        if col >= self.shape.1 {
            return Err(SparseError::index_above(col as isize, self.shape.1));
        }

        let (major, minor) = self.format.swap(row, col);
        Ok(self.lookup(major, minor).unwrap_or_else(T::zero))
    }

    /// Looks up each `(rows[k], cols[k])` coordinate independently,
    /// resolving absent entries to `not_found`.
    ///
    /// This is inner (element-wise) fancy indexing: the coordinate arrays
    /// must have equal length and the result has one value per coordinate.
    ///
    /// # Errors
    ///
    /// * `Dimension` if the coordinate arrays disagree in length
    /// * `IndexRange` if any coordinate is out of bounds
    pub fn sample_values(&self, rows: &[usize], cols: &[usize], not_found: T) -> Result<Vec<T>> {
        if rows.len() != cols.len() {
            return Err(SparseError::Dimension(
                "row and column index arrays should have the same size".to_string(),
            ));
        }
        for &r in rows {
            if r >= self.shape.0 {
                return Err(SparseError::index_above(r as isize, self.shape.0));
            }
        }
        for &c in cols {
            if c >= self.shape.1 {
                return Err(SparseError::index_above(c as isize, self.shape.1));
            }
        }

        let values = rows
            .par_iter()
            .zip(cols.par_iter())
            .map(|(&row, &col)| {
                let (major, minor) = self.format.swap(row, col);
                self.lookup(major, minor).unwrap_or(not_found)
            })
            .collect();

        Ok(values)
    }

    /// Classifies each `(majors[k], minors[k])` coordinate as an existing
    /// stored entry or an absent one: existing coordinates map to their
    /// entry offset in `data`/`indices`, absent ones to `-1`.
    ///
    /// This is the existence probe the mutation engine runs before deciding
    /// between overwriting in place and inserting new entries. Coordinates
    /// must already be in major/minor order and within bounds.
    pub(crate) fn sample_offsets(&self, majors: &[usize], minors: &[usize]) -> Vec<isize> {
        majors
            .par_iter()
            .zip(minors.par_iter())
            .map(|(&r, &m)| match self.lookup_offset(r, m) {
                Some(p) => p as isize,
                None => -1,
            })
            .collect()
    }

    /// Logical value at (major, minor): `None` when no entry is stored,
    /// the duplicate-sum otherwise.
    fn lookup(&self, major: usize, minor: usize) -> Option<T> {
        let (start, end) = self.major_bounds(major);
        let lane = &self.indices[start..end];

        if self.canonical.get() == Some(true) {
            // At most one entry per coordinate, in sorted order
            return lane
                .binary_search(&minor)
                .ok()
                .map(|k| self.data[start + k]);
        }

        let mut acc: Option<T> = None;
        for (k, &m) in lane.iter().enumerate() {
            if m == minor {
                let value = self.data[start + k];
                acc = Some(match acc {
                    Some(prev) => prev.combine(value),
                    None => value,
                });
            }
        }
        acc
    }

    /// Offset of the stored entry at (major, minor); with duplicates
    /// present, the last stored occurrence wins.
    fn lookup_offset(&self, major: usize, minor: usize) -> Option<usize> {
        let (start, end) = self.major_bounds(major);
        let lane = &self.indices[start..end];

        if self.canonical.get() == Some(true) {
            return lane.binary_search(&minor).ok().map(|k| start + k);
        }

        lane.iter()
            .rposition(|&m| m == minor)
            .map(|k| start + k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::Format;

    fn sample_csr() -> CompressedMatrix<f64> {
        // [1 2 0]
        // [0 3 0]
        // [4 0 5]
        CompressedMatrix::from_parts(
            Format::Csr,
            (3, 3),
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
            vec![0, 1, 1, 0, 2],
            vec![0, 2, 3, 5],
        )
        .unwrap()
    }

    #[test]
    fn test_scalar_get() {
        let matrix = sample_csr();

        assert_eq!(matrix.get(0, 1).unwrap(), 2.0);
        assert_eq!(matrix.get(2, 2).unwrap(), 5.0);
        assert_eq!(matrix.get(1, 0).unwrap(), 0.0);
    }

    #[test]
    fn test_scalar_get_csc() {
        let matrix = sample_csr().to_format(Format::Csc);

        assert_eq!(matrix.get(0, 1).unwrap(), 2.0);
        assert_eq!(matrix.get(2, 0).unwrap(), 4.0);
        assert_eq!(matrix.get(1, 2).unwrap(), 0.0);
    }

    #[test]
    fn test_get_out_of_bounds() {
        let matrix = sample_csr();
        assert!(matches!(
            matrix.get(3, 0),
            Err(SparseError::IndexRange { .. })
        ));
    }

    #[test]
    fn test_get_sums_duplicates() {
        let matrix = CompressedMatrix::from_parts(
            Format::Csr,
            (1, 3),
            vec![1.5, 2.5],
            vec![2, 2],
            vec![0, 2],
        )
        .unwrap();

        assert_eq!(matrix.get(0, 2).unwrap(), 4.0);
    }

    #[test]
    fn test_sample_values() {
        let matrix = sample_csr();

        let values = matrix
            .sample_values(&[0, 1, 2, 1], &[1, 1, 0, 2], -9.0)
            .unwrap();
        assert_eq!(values, vec![2.0, 3.0, 4.0, -9.0]);
    }

    #[test]
    fn test_sample_values_length_mismatch() {
        let matrix = sample_csr();
        assert!(matches!(
            matrix.sample_values(&[0, 1], &[0], 0.0),
            Err(SparseError::Dimension(_))
        ));
    }

    #[test]
    fn test_sample_offsets_sentinel() {
        let matrix = sample_csr();

        let offsets = matrix.sample_offsets(&[0, 1, 1], &[1, 1, 0]);
        assert_eq!(offsets, vec![1, 2, -1]);
    }
}
