//! Outer (fancy) indexing with arbitrary index arrays
//!
//! Major-axis selection is a lane gather: each requested lane is copied as
//! a block, so repeats and reorderings cost only the copied entries.
//! Minor-axis selection is the harder direction because one stored entry
//! can appear at several output positions when the index array repeats a
//! minor position. It runs as a counting-sort pipeline: histogram the
//! requested positions, size each output lane from the histogram, then
//! expand every stored entry into its output occurrences.

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use crate::error::{Result, SparseError};
use crate::matrix::flags::CachedFlag;
use crate::matrix::CompressedMatrix;
use crate::scalar::Scalar;
use crate::utils::{exclusive_scan, split_by_ptr};

impl<T: Scalar> CompressedMatrix<T> {
    /// Extracts the sub-matrix selected by arbitrary row and column index
    /// arrays, as the outer product of the two selections.
    ///
    /// The result has shape `(rows.len(), cols.len())` with
    /// `result[a, b] = self[rows[a], cols[b]]`. Either array may repeat or
    /// reorder positions.
    ///
    /// # Errors
    ///
    /// `IndexRange` if any index is out of bounds for its axis.
    pub fn get_outer(&self, rows: &[usize], cols: &[usize]) -> Result<Self> {
        let (major, minor) = self.format.swap(rows, cols);
        self.major_index_fancy(major)?.minor_index_fancy(minor)
    }

    /// Selects lanes along the major axis in the order given.
    ///
    /// # Errors
    ///
    /// `IndexRange` if any lane index is out of bounds.
    pub fn major_index_fancy(&self, idx: &[usize]) -> Result<Self> {
        let m = self.major_dim();
        let n = self.minor_dim();
        for &r in idx {
            if r >= m {
                return Err(SparseError::index_above(r as isize, m));
            }
        }

        let new_shape = {
            let (r, c) = self.format.swap(idx.len(), n);
            (r, c)
        };

        if idx.len() == 0 || self.nnz() == 0 {
            return Ok(Self::empty(self.format, new_shape));
        }

        let counts: Vec<usize> = idx
            .par_iter()
            .map(|&r| {
                let (start, end) = self.major_bounds(r);
                end - start
            })
            .collect();
        let indptr = exclusive_scan(&counts);
        let total = indptr[idx.len()];

        let mut indices = vec![0usize; total];
        let mut data = vec![T::zero(); total];

        // Each output lane is an exact copy of its source lane
        let index_lanes = split_by_ptr(&indptr, &mut indices);
        let data_lanes = split_by_ptr(&indptr, &mut data);
        index_lanes
            .into_par_iter()
            .zip(data_lanes)
            .zip(idx.par_iter())
            .for_each(|((out_indices, out_data), &r)| {
                let (start, end) = self.major_bounds(r);
                out_indices.copy_from_slice(&self.indices[start..end]);
                out_data.copy_from_slice(&self.data[start..end]);
            });

        Ok(Self::from_parts_trusted(
            self.format,
            new_shape,
            data,
            indices,
            indptr,
            self.sorted.clone(),
            self.canonical.clone(),
        ))
    }

    /// Selects positions along the minor axis in the order given.
    ///
    /// A stored entry at minor position `j` lands at every output position
    /// `k` with `idx[k] == j`, so a repeated index duplicates the entry
    /// into each occurrence.
    ///
    /// # Errors
    ///
    /// `IndexRange` if any position is out of bounds.
    pub fn minor_index_fancy(&self, idx: &[usize]) -> Result<Self> {
        let m = self.major_dim();
        let n = self.minor_dim();
        for &j in idx {
            if j >= n {
                return Err(SparseError::index_above(j as isize, n));
            }
        }

        let new_minor = idx.len();
        let new_shape = {
            let (r, c) = self.format.swap(m, new_minor);
            (r, c)
        };

        if new_minor == 0 || self.nnz() == 0 {
            return Ok(Self::empty(self.format, new_shape));
        }

        // 1. Histogram: how many output positions each source minor feeds
        let histogram: Vec<AtomicUsize> = (0..n).map(|_| AtomicUsize::new(0)).collect();
        idx.par_iter().for_each(|&j| {
            histogram[j].fetch_add(1, Ordering::Relaxed);
        });
        let occurrence_counts: Vec<usize> =
            histogram.into_iter().map(|a| a.into_inner()).collect();

        // 2. Group the output positions of each source minor, ascending.
        //    This is a stable counting sort of 0..idx.len() keyed by idx[k].
        let occurrence_ptr = exclusive_scan(&occurrence_counts);
        let mut occurrences = vec![0usize; new_minor];
        let mut cursor = occurrence_ptr.clone();
        for (k, &j) in idx.iter().enumerate() {
            occurrences[cursor[j]] = k;
            cursor[j] += 1;
        }

        // 3. Size each output lane: every stored entry contributes one
        //    output entry per occurrence of its minor position
        let counts: Vec<usize> = (0..m)
            .into_par_iter()
            .map(|r| {
                let (start, end) = self.major_bounds(r);
                self.indices[start..end]
                    .iter()
                    .map(|&j| occurrence_counts[j])
                    .sum()
            })
            .collect();
        let indptr = exclusive_scan(&counts);
        let total = indptr[m];

        // 4. Claim an output run per stored entry through a per-lane
        //    fetch-and-add cursor. The claims parallelize over entries, so
        //    entries of the same lane race for slots; the cursor makes the
        //    placement disjoint. Entries whose minor never occurs in `idx`
        //    claim an empty run and contribute no writes.
        let mut entry_lanes = vec![0usize; self.nnz()];
        for (r, lane) in split_by_ptr(&self.indptr, &mut entry_lanes)
            .into_iter()
            .enumerate()
        {
            lane.fill(r);
        }

        let cursors: Vec<AtomicUsize> = (0..m).map(|_| AtomicUsize::new(0)).collect();
        let claims: Vec<usize> = (0..self.nnz())
            .into_par_iter()
            .map(|p| {
                let run = occurrence_counts[self.indices[p]];
                cursors[entry_lanes[p]].fetch_add(run, Ordering::Relaxed)
            })
            .collect();

        // 5. Expand each entry into its occurrences at its claimed run
        let mut indices = vec![0usize; total];
        let mut data = vec![T::zero(); total];

        let index_lanes = split_by_ptr(&indptr, &mut indices);
        let data_lanes = split_by_ptr(&indptr, &mut data);
        index_lanes
            .into_par_iter()
            .zip(data_lanes)
            .enumerate()
            .for_each(|(r, (out_indices, out_data))| {
                let (start, end) = self.major_bounds(r);
                for p in start..end {
                    let j = self.indices[p];
                    let mut w = claims[p];
                    for &k in &occurrences[occurrence_ptr[j]..occurrence_ptr[j + 1]] {
                        out_indices[w] = k;
                        out_data[w] = self.data[p];
                        w += 1;
                    }
                }
            });

        // Claim order is racy across entries of a lane, so neither ordering
        // nor uniqueness survives the gather
        Ok(Self::from_parts_trusted(
            self.format,
            new_shape,
            data,
            indices,
            indptr,
            CachedFlag::unknown(),
            CachedFlag::unknown(),
        ))
    }
}
