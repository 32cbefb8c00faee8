//! Indexing engine tests: scalar lookup, slicing and fancy indexing

use ndarray::array;
use spindex::{CompressedMatrix, Format, Slice, SparseError};

/// [1 0 2 0]
/// [0 3 0 4]
/// [5 0 0 6]
/// [0 7 8 0]
fn sample(format: Format) -> CompressedMatrix<f64> {
    let dense = array![
        [1.0, 0.0, 2.0, 0.0],
        [0.0, 3.0, 0.0, 4.0],
        [5.0, 0.0, 0.0, 6.0],
        [0.0, 7.0, 8.0, 0.0]
    ];
    CompressedMatrix::from_dense(format, &dense)
}

#[test]
fn test_scalar_get_both_formats() {
    for format in [Format::Csr, Format::Csc] {
        let matrix = sample(format);

        assert_eq!(matrix.get(0, 2).unwrap(), 2.0);
        assert_eq!(matrix.get(3, 1).unwrap(), 7.0);
        assert_eq!(matrix.get(2, 1).unwrap(), 0.0);
    }
}

#[test]
fn test_scalar_get_bounds() {
    let matrix = sample(Format::Csr);
    assert!(matches!(
        matrix.get(4, 0),
        Err(SparseError::IndexRange { .. })
    ));
    assert!(matches!(
        matrix.get(0, 4),
        Err(SparseError::IndexRange { .. })
    ));
}

#[test]
fn test_row_slice() {
    let matrix = sample(Format::Csr);
    let sliced = matrix
        .get_slice(Slice::new(1, 3, 1), Slice::full(4))
        .unwrap();

    assert_eq!(sliced.shape(), (2, 4));
    assert_eq!(
        sliced.to_dense(),
        array![[0.0, 3.0, 0.0, 4.0], [5.0, 0.0, 0.0, 6.0]]
    );
}

#[test]
fn test_column_slice_with_step() {
    let matrix = sample(Format::Csr);
    let sliced = matrix
        .get_slice(Slice::full(4), Slice::new(0, 4, 2))
        .unwrap();

    assert_eq!(sliced.shape(), (4, 2));
    assert_eq!(
        sliced.to_dense(),
        array![[1.0, 2.0], [0.0, 0.0], [5.0, 0.0], [0.0, 8.0]]
    );
}

#[test]
fn test_negative_step_reverses() {
    let matrix = sample(Format::Csr);
    let reversed = matrix
        .get_slice(Slice::new(3, -5, -1), Slice::full(4))
        .unwrap();

    assert_eq!(
        reversed.to_dense(),
        array![
            [0.0, 7.0, 8.0, 0.0],
            [5.0, 0.0, 0.0, 6.0],
            [0.0, 3.0, 0.0, 4.0],
            [1.0, 0.0, 2.0, 0.0]
        ]
    );
}

#[test]
fn test_slicing_matches_on_both_formats() {
    let rows = Slice::new(0, 3, 1);
    let cols = Slice::new(1, 4, 2);

    let from_csr = sample(Format::Csr).get_slice(rows, cols).unwrap();
    let from_csc = sample(Format::Csc).get_slice(rows, cols).unwrap();

    assert_eq!(from_csr.to_dense(), from_csc.to_dense());
    assert_eq!(from_csr.format(), Format::Csr);
    assert_eq!(from_csc.format(), Format::Csc);
}

#[test]
fn test_empty_slice() {
    let matrix = sample(Format::Csr);
    let empty = matrix
        .get_slice(Slice::new(2, 2, 1), Slice::full(4))
        .unwrap();

    assert_eq!(empty.shape(), (0, 4));
    assert_eq!(empty.nnz(), 0);
}

#[test]
fn test_sample_values_inner_indexing() {
    let matrix = sample(Format::Csr);

    // One value per coordinate pair, absent entries resolve to the fill
    let values = matrix
        .sample_values(&[0, 1, 2, 3], &[0, 1, 1, 2], -1.0)
        .unwrap();
    assert_eq!(values, vec![1.0, 3.0, -1.0, 8.0]);
}

#[test]
fn test_outer_fancy_indexing() {
    let matrix = sample(Format::Csr);
    let selected = matrix.get_outer(&[3, 0], &[1, 2, 1]).unwrap();

    assert_eq!(selected.shape(), (2, 3));
    assert_eq!(
        selected.to_dense(),
        array![[7.0, 8.0, 7.0], [0.0, 2.0, 0.0]]
    );
}

#[test]
fn test_minor_fancy_with_repeats() {
    // [0 5 0]      cols [1, 1, 2]      [5 5 0]
    // [0 0 6]  -------------------->   [0 0 6]
    let matrix = CompressedMatrix::from_parts(
        Format::Csr,
        (2, 3),
        vec![5.0, 6.0],
        vec![1, 2],
        vec![0, 1, 2],
    )
    .unwrap();

    let selected = matrix.minor_index_fancy(&[1, 1, 2]).unwrap();

    assert_eq!(selected.shape(), (2, 3));
    assert_eq!(selected.get(0, 0).unwrap(), 5.0);
    assert_eq!(selected.get(0, 1).unwrap(), 5.0);
    assert_eq!(selected.get(1, 2).unwrap(), 6.0);
    assert_eq!(selected.nnz(), 3);
}

#[test]
fn test_fancy_indexing_matches_dense_reference() {
    let matrix = sample(Format::Csr);
    let dense = matrix.to_dense();

    let rows = [2usize, 2, 0];
    let cols = [3usize, 0, 0, 3];
    let selected = matrix.get_outer(&rows, &cols).unwrap();

    let expected = ndarray::Array2::from_shape_fn((rows.len(), cols.len()), |(a, b)| {
        dense[[rows[a], cols[b]]]
    });
    assert_eq!(selected.to_dense(), expected);
}

#[test]
fn test_indexing_preserves_source() {
    let matrix = sample(Format::Csr);
    let before = matrix.to_dense();

    let _ = matrix.get_outer(&[1, 1], &[0, 2]).unwrap();
    let _ = matrix.get_slice(Slice::new(0, 2, 1), Slice::new(1, 3, 1)).unwrap();

    assert_eq!(matrix.to_dense(), before);
}
