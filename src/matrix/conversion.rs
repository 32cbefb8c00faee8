//! Conversion between compressed form and the exchange representations
//!
//! Covers reformatting between CSR and CSC, and converting to and from
//! dense arrays and coordinate triples. All conversions are counting-sort
//! based: count entries per destination lane, prefix-sum the counts into a
//! pointer array, then scatter.

use ndarray::Array2;

use crate::matrix::flags::CachedFlag;
use crate::matrix::{CompressedMatrix, CooMatrix, Format};
use crate::scalar::Scalar;
use crate::utils::exclusive_scan;

impl<T: Scalar> CompressedMatrix<T> {
    /// Converts this matrix to the given storage format.
    ///
    /// Converting to the matrix's own format returns a plain copy. The
    /// converted matrix always has sorted indices: the scatter visits
    /// source lanes in ascending order, so each destination lane receives
    /// its minor positions in ascending order.
    pub fn to_format(&self, format: Format) -> Self {
        if format == self.format {
            return self.clone();
        }

        let major = self.major_dim();
        let new_major = self.minor_dim();
        let nnz = self.nnz();

        // Count entries per destination lane
        let mut counts = vec![0usize; new_major];
        for &m in &self.indices {
            counts[m] += 1;
        }

        let new_indptr = exclusive_scan(&counts);

        // Scatter, tracking a write cursor per destination lane
        let mut new_indices = vec![0usize; nnz];
        let mut new_data = vec![T::zero(); nnz];
        let mut cursor = new_indptr.clone();

        for r in 0..major {
            let (start, end) = self.major_bounds(r);
            for p in start..end {
                let m = self.indices[p];
                let pos = cursor[m];

                new_indices[pos] = r;
                new_data[pos] = self.data[p];
                cursor[m] += 1;
            }
        }

        // Duplicates survive the scatter, so canonical carries over only
        // when it was already known to hold
        let canonical = if self.canonical.get() == Some(true) {
            CachedFlag::known(true)
        } else {
            CachedFlag::unknown()
        };

        CompressedMatrix::from_parts_trusted(
            format,
            self.shape,
            new_data,
            new_indices,
            new_indptr,
            CachedFlag::known(true),
            canonical,
        )
    }

    /// Reformats another compressed matrix into this format
    pub fn from_compressed(format: Format, other: &CompressedMatrix<T>) -> Self {
        other.to_format(format)
    }

    /// Converts a coordinate matrix to compressed form
    pub fn from_coo(format: Format, coo: &CooMatrix<T>) -> Self {
        let major = format.major_dim(coo.shape);
        let nnz = coo.nnz();

        let mut counts = vec![0usize; major];
        for k in 0..nnz {
            let (i, _) = format.swap(coo.row[k], coo.col[k]);
            counts[i] += 1;
        }

        let indptr = exclusive_scan(&counts);

        let mut indices = vec![0usize; nnz];
        let mut data = vec![T::zero(); nnz];
        let mut cursor = indptr.clone();

        for k in 0..nnz {
            let (i, j) = format.swap(coo.row[k], coo.col[k]);
            let pos = cursor[i];

            indices[pos] = j;
            data[pos] = coo.data[k];
            cursor[i] += 1;
        }

        // Entry order within a lane follows the coordinate array order,
        // which need not be sorted
        CompressedMatrix::from_parts_trusted(
            format,
            coo.shape,
            data,
            indices,
            indptr,
            CachedFlag::unknown(),
            CachedFlag::unknown(),
        )
    }

    /// Expands this matrix to coordinate triples, preserving entry order
    pub fn to_coo(&self) -> CooMatrix<T> {
        let mut row = Vec::with_capacity(self.nnz());
        let mut col = Vec::with_capacity(self.nnz());

        for r in 0..self.major_dim() {
            let (start, end) = self.major_bounds(r);
            for p in start..end {
                let (i, j) = self.format.swap(r, self.indices[p]);
                row.push(i);
                col.push(j);
            }
        }

        CooMatrix {
            shape: self.shape,
            row,
            col,
            data: self.data.clone(),
        }
    }

    /// Converts a dense array to compressed form, storing only nonzeros
    pub fn from_dense(format: Format, dense: &Array2<T>) -> Self {
        let shape = dense.dim();
        let major = format.major_dim(shape);
        let minor = format.minor_dim(shape);

        let mut indptr = Vec::with_capacity(major + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();
        indptr.push(0);

        for r in 0..major {
            for m in 0..minor {
                let (i, j) = format.swap(r, m);
                let value = dense[[i, j]];
                if !value.is_zero() {
                    indices.push(m);
                    data.push(value);
                }
            }
            indptr.push(data.len());
        }

        CompressedMatrix::from_parts_trusted(
            format,
            shape,
            data,
            indices,
            indptr,
            CachedFlag::known(true),
            CachedFlag::known(true),
        )
    }

    /// Densifies the matrix. Duplicate entries are summed, matching the
    /// logical read semantics of a non-canonical matrix.
    pub fn to_dense(&self) -> Array2<T> {
        let mut dense = Array2::from_elem(self.shape, T::zero());

        for r in 0..self.major_dim() {
            for (m, &value) in self.major_iter(r) {
                let (i, j) = self.format.swap(r, m);
                dense[[i, j]] = dense[[i, j]].combine(value);
            }
        }

        dense
    }
}
