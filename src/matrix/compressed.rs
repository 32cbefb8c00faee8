//! The compressed sparse matrix core
//!
//! A `CompressedMatrix<T>` stores a two-dimensional sparse matrix using
//! three arrays:
//! - `indptr`: size `major_dim + 1`; entries of major lane `r` occupy the
//!   half-open range `[indptr[r], indptr[r+1])` of the other two arrays
//! - `indices`: size `nnz`, the minor-axis position of each stored entry
//! - `data`: size `nnz`, the stored values (which may include explicit zeros)
//!
//! The major axis is rows for CSR and columns for CSC; every algorithm in
//! this crate works on major/minor terms and lets [`Format`] translate at
//! the boundary.

use std::fmt;

use rayon::prelude::*;

use crate::error::{Result, SparseError};
use crate::matrix::flags::CachedFlag;
use crate::matrix::Format;
use crate::scalar::Scalar;
use crate::utils::split_by_ptr;

/// A sparse matrix held in compressed (CSR or CSC) form
#[derive(Clone)]
pub struct CompressedMatrix<T> {
    pub(crate) format: Format,
    pub(crate) shape: (usize, usize),
    pub(crate) data: Vec<T>,
    pub(crate) indices: Vec<usize>,
    pub(crate) indptr: Vec<usize>,
    pub(crate) sorted: CachedFlag,
    pub(crate) canonical: CachedFlag,
}

impl<T: Scalar> CompressedMatrix<T> {
    /// Creates a matrix from an explicit `(data, indices, indptr)` triple.
    ///
    /// # Arguments
    ///
    /// * `format` - Storage order (CSR or CSC)
    /// * `shape` - `(rows, cols)` of the matrix
    /// * `data` - Stored values (size `nnz`)
    /// * `indices` - Minor-axis positions (size `nnz`)
    /// * `indptr` - Major-lane pointers (size `major_dim + 1`)
    ///
    /// # Errors
    ///
    /// * `Dimension` if `data` and `indices` disagree in length
    /// * `Shape` if `indptr` has the wrong length, does not start at zero,
    ///   is not monotone, or does not end at `nnz`
    /// * `IndexRange` if any minor index is out of bounds
    pub fn from_parts(
        format: Format,
        shape: (usize, usize),
        data: Vec<T>,
        indices: Vec<usize>,
        indptr: Vec<usize>,
    ) -> Result<Self> {
        if data.len() != indices.len() {
            return Err(SparseError::Dimension(
                "indices and data should have the same size".to_string(),
            ));
        }

        let major = format.major_dim(shape);
        let minor = format.minor_dim(shape);

        if indptr.len() != major + 1 {
            return Err(SparseError::indptr_size(indptr.len(), major + 1));
        }
        if indptr[0] != 0 {
            return Err(SparseError::Shape(
                "index pointer should start with 0".to_string(),
            ));
        }
        if indptr.windows(2).any(|w| w[0] > w[1]) {
            return Err(SparseError::Shape(
                "index pointer values must form a non-decreasing sequence".to_string(),
            ));
        }
        if indptr[major] != data.len() {
            return Err(SparseError::Shape(format!(
                "index pointer end ({}) should be the number of stored values ({})",
                indptr[major],
                data.len()
            )));
        }
        for &m in &indices {
            if m >= minor {
                return Err(SparseError::index_above(m as isize, minor));
            }
        }

        Ok(Self {
            format,
            shape,
            data,
            indices,
            indptr,
            sorted: CachedFlag::unknown(),
            canonical: CachedFlag::unknown(),
        })
    }

    /// Builds a matrix from arrays the caller has already proven valid,
    /// carrying known flag states through.
    pub(crate) fn from_parts_trusted(
        format: Format,
        shape: (usize, usize),
        data: Vec<T>,
        indices: Vec<usize>,
        indptr: Vec<usize>,
        sorted: CachedFlag,
        canonical: CachedFlag,
    ) -> Self {
        debug_assert_eq!(data.len(), indices.len());
        debug_assert_eq!(indptr.len(), format.major_dim(shape) + 1);

        Self {
            format,
            shape,
            data,
            indices,
            indptr,
            sorted,
            canonical,
        }
    }

    /// Creates an empty matrix with the given shape
    pub fn empty(format: Format, shape: (usize, usize)) -> Self {
        Self {
            format,
            shape,
            data: Vec::new(),
            indices: Vec::new(),
            indptr: vec![0; format.major_dim(shape) + 1],
            sorted: CachedFlag::known(true),
            canonical: CachedFlag::known(true),
        }
    }

    /// Returns the number of stored values, including explicit zeros
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// Returns the `(rows, cols)` shape of the matrix
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    /// Returns the storage format tag
    pub fn format(&self) -> Format {
        self.format
    }

    /// Length of the major axis (rows for CSR, columns for CSC)
    pub fn major_dim(&self) -> usize {
        self.format.major_dim(self.shape)
    }

    /// Length of the minor axis
    pub fn minor_dim(&self) -> usize {
        self.format.minor_dim(self.shape)
    }

    /// The stored values
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// The stored minor-axis positions
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// The major-lane pointer array
    pub fn indptr(&self) -> &[usize] {
        &self.indptr
    }

    /// Half-open entry range of major lane `r`
    #[inline]
    pub(crate) fn major_bounds(&self, r: usize) -> (usize, usize) {
        (self.indptr[r], self.indptr[r + 1])
    }

    /// Returns an iterator over the stored entries of major lane `r`
    ///
    /// Each item is a `(minor_index, value)` pair.
    pub fn major_iter(&self, r: usize) -> impl Iterator<Item = (usize, &T)> {
        let (start, end) = self.major_bounds(r);

        self.indices[start..end]
            .iter()
            .zip(&self.data[start..end])
            .map(|(&m, val)| (m, val))
    }

    /// Whether every major lane stores its minor indices in non-decreasing
    /// order.
    ///
    /// Computed lazily as a parallel AND over per-lane checks and cached
    /// until a structural mutation invalidates it.
    pub fn has_sorted_indices(&self) -> bool {
        if self.data.is_empty() {
            self.sorted.set(true);
            return true;
        }
        if let Some(cached) = self.sorted.get() {
            return cached;
        }

        let sorted = (0..self.major_dim()).into_par_iter().all(|r| {
            let (start, end) = self.major_bounds(r);
            self.indices[start..end].windows(2).all(|w| w[0] <= w[1])
        });

        self.sorted.set(sorted);
        sorted
    }

    /// Whether the matrix is canonical: sorted indices and no duplicate
    /// (major, minor) pairs within a lane.
    ///
    /// Canonical implies sorted, so a cached negative sorted flag settles
    /// this immediately, and a positive answer here also marks the matrix
    /// sorted.
    pub fn has_canonical_format(&self) -> bool {
        if self.data.is_empty() {
            self.canonical.set(true);
            return true;
        }
        if self.sorted.get() == Some(false) {
            // not sorted => not canonical
            self.canonical.set(false);
            return false;
        }
        if let Some(cached) = self.canonical.get() {
            return cached;
        }

        let canonical = (0..self.major_dim()).into_par_iter().all(|r| {
            let (start, end) = self.major_bounds(r);
            start <= end && self.indices[start..end].windows(2).all(|w| w[0] < w[1])
        });

        self.canonical.set(canonical);
        if canonical {
            self.sorted.set(true);
        }
        canonical
    }

    /// Overrides the cached sorted flag
    pub fn set_has_sorted_indices(&mut self, value: bool) {
        self.sorted.set(value);
        if !value {
            self.canonical.invalidate();
        }
    }

    /// Overrides the cached canonical flag; a true value implies sorted
    pub fn set_has_canonical_format(&mut self, value: bool) {
        self.canonical.set(value);
        if value {
            self.sorted.set(true);
        }
    }

    /// Sorts the minor indices within each major lane, in parallel.
    ///
    /// Values travel with their indices. No-op when the matrix is already
    /// known to be sorted.
    pub fn sort_indices(&mut self) {
        if self.has_sorted_indices() {
            return;
        }

        let index_rows = split_by_ptr(&self.indptr, &mut self.indices);
        let data_rows = split_by_ptr(&self.indptr, &mut self.data);

        index_rows
            .into_par_iter()
            .zip(data_rows)
            .for_each(|(row_indices, row_data)| {
                let mut perm: Vec<usize> = (0..row_indices.len()).collect();
                perm.sort_by_key(|&k| row_indices[k]);

                let sorted_indices: Vec<usize> = perm.iter().map(|&k| row_indices[k]).collect();
                let sorted_data: Vec<T> = perm.iter().map(|&k| row_data[k]).collect();

                row_indices.copy_from_slice(&sorted_indices);
                row_data.copy_from_slice(&sorted_data);
            });

        self.sorted.set(true);
        // Sorting may have made duplicates adjacent but did not remove them
        self.canonical.invalidate();
    }

    /// Returns the transpose by reinterpreting the same arrays in the
    /// other format. No entries move: the major lanes of a CSR matrix are
    /// exactly the major lanes of its CSC transpose.
    pub fn transpose(&self) -> Self {
        Self {
            format: self.format.transposed(),
            shape: (self.shape.1, self.shape.0),
            data: self.data.clone(),
            indices: self.indices.clone(),
            indptr: self.indptr.clone(),
            sorted: self.sorted.clone(),
            canonical: self.canonical.clone(),
        }
    }

    /// Returns a copy of this matrix with sorted indices
    pub fn sorted_indices(&self) -> Self {
        let mut copy = self.clone();
        copy.sort_indices();
        copy
    }

    /// Eliminates duplicate entries by summing them, re-sorting each major
    /// lane in the process. In-place; no-op when the matrix is already
    /// canonical. Idempotent.
    pub fn sum_duplicates(&mut self) {
        if self.has_canonical_format() {
            return;
        }

        let major = self.major_dim();

        // Group and sum per lane, in parallel
        let lane_results: Vec<(Vec<usize>, Vec<T>)> = (0..major)
            .into_par_iter()
            .map(|r| {
                let (start, end) = self.major_bounds(r);
                let mut perm: Vec<usize> = (start..end).collect();
                perm.sort_by_key(|&p| self.indices[p]);

                let mut minors: Vec<usize> = Vec::with_capacity(perm.len());
                let mut values: Vec<T> = Vec::with_capacity(perm.len());

                for &p in &perm {
                    let minor = self.indices[p];
                    let value = self.data[p];

                    if minors.last() == Some(&minor) {
                        let last = values.len() - 1;
                        values[last] = values[last].combine(value);
                    } else {
                        minors.push(minor);
                        values.push(value);
                    }
                }

                (minors, values)
            })
            .collect();

        // Assemble the deduplicated arrays
        let mut indptr = Vec::with_capacity(major + 1);
        indptr.push(0);

        let mut running_nnz = 0;
        for (minors, _) in &lane_results {
            running_nnz += minors.len();
            indptr.push(running_nnz);
        }

        let mut indices = Vec::with_capacity(running_nnz);
        let mut data = Vec::with_capacity(running_nnz);

        for (minors, values) in lane_results {
            indices.extend(minors);
            data.extend(values);
        }

        // Replace the three backing arrays as a unit
        self.data = data;
        self.indices = indices;
        self.indptr = indptr;
        self.sorted.set(true);
        self.canonical.set(true);
    }
}

impl<T: Scalar> fmt::Debug for CompressedMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CompressedMatrix {{")?;
        writeln!(f, "  format: {}", self.format.name())?;
        writeln!(f, "  dimensions: {} × {}", self.shape.0, self.shape.1)?;
        writeln!(f, "  nnz: {}", self.nnz())?;

        // Print a sample of the matrix content
        let max_lanes_to_print = 5.min(self.major_dim());

        if max_lanes_to_print > 0 {
            writeln!(f, "  content sample:")?;

            for r in 0..max_lanes_to_print {
                write!(f, "    {} {}: ", self.format.swap("row", "col").0, r)?;
                let (start, end) = self.major_bounds(r);

                if start == end {
                    writeln!(f, "(empty)")?;
                } else {
                    let max_elements = 5.min(end - start);

                    for p in start..(start + max_elements) {
                        write!(f, "({}, {:?}) ", self.indices[p], self.data[p])?;
                    }

                    if end - start > max_elements {
                        write!(f, "... ({} more)", end - start - max_elements)?;
                    }

                    writeln!(f)?;
                }
            }

            if self.major_dim() > max_lanes_to_print {
                writeln!(
                    f,
                    "    ... ({} more lanes)",
                    self.major_dim() - max_lanes_to_print
                )?;
            }
        }

        write!(f, "}}")
    }
}
