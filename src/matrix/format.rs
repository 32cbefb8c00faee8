//! Storage format tag for compressed sparse matrices
//!
//! All indexing, mutation and reduction algorithms in this crate are written
//! in terms of a major axis (the axis `indptr` runs over) and a minor axis
//! (the axis whose positions are stored in `indices`). The format tag maps
//! between (row, col) and (major, minor) once at the API boundary; CSR and
//! CSC are then two instantiations of the same generic algorithm set.

/// Compressed storage order of a sparse matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Compressed Sparse Row: rows are the major axis
    Csr,
    /// Compressed Sparse Column: columns are the major axis
    Csc,
}

impl Format {
    /// Maps a (row, col)-ordered pair to (major, minor) order, and back.
    ///
    /// The mapping is its own inverse, so the same call translates in either
    /// direction.
    #[inline]
    pub fn swap<U>(self, x: U, y: U) -> (U, U) {
        match self {
            Format::Csr => (x, y),
            Format::Csc => (y, x),
        }
    }

    /// The length of the major axis for a matrix of the given shape
    #[inline]
    pub fn major_dim(self, shape: (usize, usize)) -> usize {
        self.swap(shape.0, shape.1).0
    }

    /// The length of the minor axis for a matrix of the given shape
    #[inline]
    pub fn minor_dim(self, shape: (usize, usize)) -> usize {
        self.swap(shape.0, shape.1).1
    }

    /// The other compressed format
    pub fn transposed(self) -> Format {
        match self {
            Format::Csr => Format::Csc,
            Format::Csc => Format::Csr,
        }
    }

    /// Short lowercase name, as used in diagnostics ("csr" / "csc")
    pub fn name(self) -> &'static str {
        match self {
            Format::Csr => "csr",
            Format::Csc => "csc",
        }
    }
}
