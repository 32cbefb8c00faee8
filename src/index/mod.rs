//! Indexing engine for compressed sparse matrices
//!
//! Reads never mutate: every operation either returns a scalar or builds a
//! new matrix from the source's `data`/`indices`/`indptr` without
//! densifying. The three families are:
//!
//! - scalar and inner (coordinate-wise) lookups ([`sample`])
//! - slicing along the major and minor axes ([`slice`])
//! - outer (fancy) indexing with arbitrary index arrays ([`fancy`])

pub mod fancy;
pub mod sample;
pub mod slice;

pub use slice::Slice;
