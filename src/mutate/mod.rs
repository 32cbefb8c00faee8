//! Mutation engine: in-place assignment into the stored structure
//!
//! Assignment splits into two regimes. Writing to a coordinate that already
//! holds a stored entry is a plain value overwrite and leaves the structure
//! untouched. Writing to an absent coordinate grows the structure, which
//! means rebuilding all three backing arrays; that path logs a performance
//! advisory because callers are usually better served by batching their
//! inserts or building from coordinates.
//!
//! Mutation coordinates are `isize` and support negative indexing from the
//! end of each axis. A failed bounds check aborts the whole batch before
//! any write takes place.

use ndarray::Array2;
use rayon::prelude::*;

use crate::error::{Result, SparseError};
use crate::matrix::{CompressedMatrix, CooMatrix, Format};
use crate::scalar::Scalar;
use crate::utils::{exclusive_scan, split_by_ptr};

/// Normalizes one signed coordinate against an axis bound
fn normalize(index: isize, bound: usize) -> Result<usize> {
    let resolved = if index < 0 {
        index + bound as isize
    } else {
        index
    };

    if resolved < 0 {
        Err(SparseError::index_below(index, bound))
    } else if resolved as usize >= bound {
        Err(SparseError::index_above(index, bound))
    } else {
        Ok(resolved as usize)
    }
}

impl<T: Scalar> CompressedMatrix<T> {
    /// Normalizes row/col coordinate arrays into bounds-checked
    /// (major, minor) pairs
    fn prepare_indices(&self, rows: &[isize], cols: &[isize]) -> Result<(Vec<usize>, Vec<usize>)> {
        let mut majors = Vec::with_capacity(rows.len());
        let mut minors = Vec::with_capacity(cols.len());

        for (&row, &col) in rows.iter().zip(cols.iter()) {
            let r = normalize(row, self.shape.0)?;
            let c = normalize(col, self.shape.1)?;
            let (i, j) = self.format.swap(r, c);
            majors.push(i);
            minors.push(j);
        }

        Ok((majors, minors))
    }

    /// Sets the value at `(row, col)`, inserting a new entry if the
    /// coordinate holds no stored entry.
    ///
    /// # Errors
    ///
    /// `IndexRange` if either coordinate is out of bounds.
    pub fn set(&mut self, row: isize, col: isize, value: T) -> Result<()> {
        self.set_many(&[row], &[col], &[value])
    }

    /// Sets each `(rows[k], cols[k])` coordinate to `values[k]`.
    ///
    /// Coordinates with a stored entry are overwritten in place. Absent
    /// coordinates force a structure rebuild through [`insert_many`]
    /// (logging a performance advisory first); within the batch the last
    /// write to a coordinate wins.
    ///
    /// [`insert_many`]: Self::insert_many
    ///
    /// # Errors
    ///
    /// * `Dimension` if the three arrays disagree in length
    /// * `IndexRange` if any coordinate is out of bounds
    pub fn set_many(&mut self, rows: &[isize], cols: &[isize], values: &[T]) -> Result<()> {
        if rows.len() != cols.len() || rows.len() != values.len() {
            return Err(SparseError::Dimension(
                "row, column and value arrays should have the same size".to_string(),
            ));
        }

        let (majors, minors) = self.prepare_indices(rows, cols)?;
        let offsets = self.sample_offsets(&majors, &minors);

        let mut missed_majors = Vec::new();
        let mut missed_minors = Vec::new();
        let mut missed_values = Vec::new();

        for (k, &offset) in offsets.iter().enumerate() {
            if offset >= 0 {
                self.data[offset as usize] = values[k];
            } else {
                missed_majors.push(majors[k]);
                missed_minors.push(minors[k]);
                missed_values.push(values[k]);
            }
        }

        if !missed_majors.is_empty() {
            log::warn!(
                "changing the sparsity structure of a {}_matrix is expensive",
                self.format.name()
            );
            self.insert_many(&missed_majors, &missed_minors, &missed_values);
        }

        Ok(())
    }

    /// Overwrites the stored entries at the given coordinates with zero.
    ///
    /// The entries stay in the structure as explicit zeros; coordinates
    /// with no stored entry are already zero and are skipped.
    ///
    /// # Errors
    ///
    /// * `Dimension` if the coordinate arrays disagree in length
    /// * `IndexRange` if any coordinate is out of bounds
    pub fn zero_many(&mut self, rows: &[isize], cols: &[isize]) -> Result<()> {
        if rows.len() != cols.len() {
            return Err(SparseError::Dimension(
                "row and column index arrays should have the same size".to_string(),
            ));
        }

        let (majors, minors) = self.prepare_indices(rows, cols)?;
        let offsets = self.sample_offsets(&majors, &minors);

        for &offset in &offsets {
            if offset >= 0 {
                self.data[offset as usize] = T::zero();
            }
        }

        Ok(())
    }

    /// Inserts new entries at the given (major, minor) coordinates,
    /// rebuilding the three backing arrays.
    ///
    /// Coordinates must be in bounds. Duplicate coordinates within the
    /// batch collapse to the last value given for them. Existing entries at
    /// the same coordinates are not replaced, so the result may hold
    /// duplicates; the canonical flag is reset accordingly.
    pub(crate) fn insert_many(&mut self, majors: &[usize], minors: &[usize], values: &[T]) {
        if majors.is_empty() {
            return;
        }

        // The per-lane merge below needs sorted lanes on both sides
        self.sort_indices();

        // 1. Stable sort the batch by coordinate; within one coordinate the
        //    original assignment order survives, so the last kept entry of
        //    each group is the last write
        let mut order: Vec<usize> = (0..majors.len()).collect();
        order.sort_by_key(|&k| (majors[k], minors[k]));

        let mut ins_major = Vec::with_capacity(order.len());
        let mut ins_minor = Vec::with_capacity(order.len());
        let mut ins_value = Vec::with_capacity(order.len());
        for (pos, &k) in order.iter().enumerate() {
            let is_last_of_group = match order.get(pos + 1) {
                Some(&next) => (majors[k], minors[k]) != (majors[next], minors[next]),
                None => true,
            };
            if is_last_of_group {
                ins_major.push(majors[k]);
                ins_minor.push(minors[k]);
                ins_value.push(values[k]);
            }
        }

        // 2. New lane sizes and pointers
        let m = self.major_dim();
        let mut ins_counts = vec![0usize; m];
        for &i in &ins_major {
            ins_counts[i] += 1;
        }
        let ins_ptr = exclusive_scan(&ins_counts);

        let counts: Vec<usize> = (0..m)
            .map(|r| {
                let (start, end) = self.major_bounds(r);
                (end - start) + ins_counts[r]
            })
            .collect();
        let new_indptr = exclusive_scan(&counts);
        let total = new_indptr[m];

        // 3. Merge each lane's existing and inserted entries by minor
        //    position, existing entry first on a tie
        let mut new_indices = vec![0usize; total];
        let mut new_data = vec![T::zero(); total];

        let index_lanes = split_by_ptr(&new_indptr, &mut new_indices);
        let data_lanes = split_by_ptr(&new_indptr, &mut new_data);
        index_lanes
            .into_par_iter()
            .zip(data_lanes)
            .enumerate()
            .for_each(|(r, (out_indices, out_data))| {
                let (start, end) = self.major_bounds(r);
                let (ins_lo, ins_hi) = (ins_ptr[r], ins_ptr[r + 1]);

                let mut p = start;
                let mut q = ins_lo;
                for w in 0..out_indices.len() {
                    let take_existing =
                        p < end && (q >= ins_hi || self.indices[p] <= ins_minor[q]);
                    if take_existing {
                        out_indices[w] = self.indices[p];
                        out_data[w] = self.data[p];
                        p += 1;
                    } else {
                        out_indices[w] = ins_minor[q];
                        out_data[w] = ins_value[q];
                        q += 1;
                    }
                }
            });

        // 4. Swap in all three arrays as a unit
        self.data = new_data;
        self.indices = new_indices;
        self.indptr = new_indptr;
        self.set_has_sorted_indices(true);
        self.canonical.invalidate();
    }

    /// Assigns a sparse source into the region addressed by 2-D coordinate
    /// grids.
    ///
    /// `rows` and `cols` give the target coordinate of every position in
    /// the region, so `self[rows[[a, b]], cols[[a, b]]] = src[a, b]`. A
    /// source axis of size 1 broadcasts across the corresponding grid axis.
    /// The whole region is zeroed first; only the source's stored entries
    /// are then written.
    ///
    /// # Errors
    ///
    /// * `Dimension` if the two grids disagree in shape
    /// * `Shape` if the source shape does not broadcast to the grid shape
    /// * `IndexRange` if any grid coordinate is out of bounds
    pub fn set_sparse(
        &mut self,
        rows: &Array2<isize>,
        cols: &Array2<isize>,
        src: &CooMatrix<T>,
    ) -> Result<()> {
        if rows.dim() != cols.dim() {
            return Err(SparseError::Dimension(
                "row and column coordinate grids should have the same shape".to_string(),
            ));
        }

        let (grid_m, grid_n) = rows.dim();
        let row_fits = src.shape.0 == grid_m || src.shape.0 == 1;
        let col_fits = src.shape.1 == grid_n || src.shape.1 == 1;
        if !row_fits || !col_fits {
            return Err(SparseError::Shape(format!(
                "could not broadcast shape ({}, {}) to ({}, {})",
                src.shape.0, src.shape.1, grid_m, grid_n
            )));
        }

        // Zero the whole region, bounds-checking every grid coordinate
        // before any structural change
        let grid_rows: Vec<isize> = rows.iter().copied().collect();
        let grid_cols: Vec<isize> = cols.iter().copied().collect();
        self.zero_many(&grid_rows, &grid_cols)?;

        // Canonicalize the source so each region position is written once
        let mut compressed = CompressedMatrix::from_coo(Format::Csr, src);
        compressed.sum_duplicates();
        let canonical = compressed.to_coo();

        let mut r = canonical.row;
        let mut c = canonical.col;
        let mut v = canonical.data;

        if src.shape.0 == 1 && grid_m != 1 {
            let len = r.len();
            r = (0..grid_m)
                .flat_map(|i| std::iter::repeat(i).take(len))
                .collect();
            c = (0..grid_m).flat_map(|_| c.iter().copied()).collect();
            v = (0..grid_m).flat_map(|_| v.iter().copied()).collect();
        }
        if src.shape.1 == 1 && grid_n != 1 {
            let len = c.len();
            r = r
                .iter()
                .flat_map(|&i| std::iter::repeat(i).take(grid_n))
                .collect();
            c = (0..len).flat_map(|_| 0..grid_n).collect();
            v = v
                .iter()
                .flat_map(|&x| std::iter::repeat(x).take(grid_n))
                .collect();
        }

        // Route each source entry through the grids to its target coordinate
        let target_rows: Vec<isize> = r
            .iter()
            .zip(c.iter())
            .map(|(&a, &b)| rows[[a, b]])
            .collect();
        let target_cols: Vec<isize> = r
            .iter()
            .zip(c.iter())
            .map(|(&a, &b)| cols[[a, b]])
            .collect();

        self.set_many(&target_rows, &target_cols, &v)
    }
}
