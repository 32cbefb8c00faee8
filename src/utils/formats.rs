//! Interop with the sprs sparse matrix ecosystem
//!
//! Sparse-sparse combination is delegated through sprs rather than
//! reimplemented, so these helpers translate between our format-tagged
//! representation and `sprs::CsMat`. sprs requires canonical storage, so
//! `to_sprs` canonicalizes a copy when needed; everything coming back from
//! sprs is canonical by construction.

use num_traits::Num;
use sprs::CsMat;

use crate::matrix::flags::CachedFlag;
use crate::matrix::{CompressedMatrix, Format};
use crate::scalar::Scalar;

/// Converts a matrix to an `sprs::CsMat` in the same storage format
pub fn to_sprs<T>(matrix: &CompressedMatrix<T>) -> CsMat<T>
where
    T: Scalar + Num + Default,
{
    let canonical_copy;
    let source = if matrix.has_canonical_format() {
        matrix
    } else {
        let mut copy = matrix.clone();
        copy.sum_duplicates();
        canonical_copy = copy;
        &canonical_copy
    };

    match source.format() {
        Format::Csr => CsMat::new(
            source.shape(),
            source.indptr().to_vec(),
            source.indices().to_vec(),
            source.data().to_vec(),
        ),
        Format::Csc => CsMat::new_csc(
            source.shape(),
            source.indptr().to_vec(),
            source.indices().to_vec(),
            source.data().to_vec(),
        ),
    }
}

/// Converts an `sprs::CsMat` into a matrix in the requested format
pub fn from_sprs<T>(mat: CsMat<T>, format: Format) -> CompressedMatrix<T>
where
    T: Scalar + Num + Default,
{
    let aligned = match (format, mat.is_csr()) {
        (Format::Csr, true) | (Format::Csc, false) => mat,
        (Format::Csr, false) => mat.to_csr(),
        (Format::Csc, true) => mat.to_csc(),
    };

    let shape = aligned.shape();
    let (indptr, indices, data) = aligned.into_raw_storage();

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
