//! Reduction engine tests: per-lane min/max and their arg variants

use ndarray::array;
use num_complex::Complex;
use spindex::{CompressedMatrix, Format, ReduceKind, SparseError};

/// [-1 0 -3]
/// [ 0 0  0]
/// [ 2 7  4]
fn sample(format: Format) -> CompressedMatrix<f64> {
    let dense = array![[-1.0, 0.0, -3.0], [0.0, 0.0, 0.0], [2.0, 7.0, 4.0]];
    CompressedMatrix::from_dense(format, &dense)
}

#[test]
fn test_max_implicit_zero_participates() {
    // Row 0 stores only negatives but has an implicit zero, so its
    // all-positions max is 0; nonzero-only considers stored values alone
    let matrix = sample(Format::Csr);

    assert_eq!(matrix.major_max(false).unwrap(), vec![0.0, 0.0, 7.0]);
    assert_eq!(matrix.major_max(true).unwrap(), vec![-1.0, 0.0, 7.0]);
}

#[test]
fn test_min() {
    let matrix = sample(Format::Csr);

    assert_eq!(matrix.major_min(false).unwrap(), vec![-3.0, 0.0, 2.0]);
    assert_eq!(matrix.major_min(true).unwrap(), vec![-3.0, 0.0, 2.0]);
}

#[test]
fn test_empty_lane_reduces_to_zero() {
    let matrix = CompressedMatrix::<f64>::empty(Format::Csr, (2, 3));

    assert_eq!(matrix.major_max(false).unwrap(), vec![0.0, 0.0]);
    assert_eq!(matrix.major_min(true).unwrap(), vec![0.0, 0.0]);
}

#[test]
fn test_nan_poisons_its_lane_only() {
    let dense = array![[1.0, f64::NAN], [3.0, 4.0]];
    let matrix = CompressedMatrix::from_dense(Format::Csr, &dense);

    let maxima = matrix.major_max(false).unwrap();
    assert!(maxima[0].is_nan());
    assert_eq!(maxima[1], 4.0);

    let minima = matrix.major_min(false).unwrap();
    assert!(minima[0].is_nan());
    assert_eq!(minima[1], 3.0);
}

#[test]
fn test_argmax_and_argmin() {
    let matrix = sample(Format::Csr);

    // Row 0: the implicit zero at position 1 is the max, -3 at 2 the min
    // Row 1: empty lane reports position 0
    // Row 2: dense lane, 7 at 1 and 2 at 0
    assert_eq!(matrix.major_argmax().unwrap(), vec![1, 0, 1]);
    assert_eq!(matrix.major_argmin().unwrap(), vec![2, 0, 0]);
}

#[test]
fn test_arg_reduction_reports_first_zero_position() {
    // [3 0 0 5]: the zeros sit at positions 1 and 2
    let dense = array![[3.0, 0.0, 0.0, 5.0]];
    let matrix = CompressedMatrix::from_dense(Format::Csr, &dense);

    assert_eq!(matrix.major_argmin().unwrap(), vec![1]);
    assert_eq!(matrix.major_argmax().unwrap(), vec![3]);
}

#[test]
fn test_arg_reduction_nan_reports_zero() {
    let dense = array![[2.0, f64::NAN, 9.0]];
    let matrix = CompressedMatrix::from_dense(Format::Csr, &dense);

    assert_eq!(matrix.major_argmax().unwrap(), vec![0]);
    assert_eq!(matrix.major_argmin().unwrap(), vec![0]);
}

#[test]
fn test_csc_reduces_per_column() {
    let matrix = sample(Format::Csc);

    // Columns of the sample: [-1 0 2], [0 0 7], [-3 0 4]
    assert_eq!(matrix.major_max(false).unwrap(), vec![2.0, 7.0, 4.0]);
    assert_eq!(matrix.major_min(false).unwrap(), vec![-1.0, 0.0, -3.0]);
}

#[test]
fn test_reduce_kind_entry_point() {
    let matrix = sample(Format::Csr);

    assert_eq!(
        matrix.reduce_major(ReduceKind::Max, false).unwrap(),
        matrix.major_max(false).unwrap()
    );
    assert_eq!(
        matrix.arg_reduce_major(ReduceKind::Min).unwrap(),
        matrix.major_argmin().unwrap()
    );
}

#[test]
fn test_complex_matrices_rejected() {
    let matrix: CompressedMatrix<Complex<f64>> = CompressedMatrix::from_parts(
        Format::Csr,
        (1, 2),
        vec![Complex::new(1.0, -1.0)],
        vec![1],
        vec![0, 1],
    )
    .unwrap();

    assert!(matches!(
        matrix.major_max(false),
        Err(SparseError::UnsupportedType { .. })
    ));
}

#[test]
fn test_bool_matrix_arg_reduction_rejected() {
    let matrix: CompressedMatrix<bool> = CompressedMatrix::from_parts(
        Format::Csr,
        (1, 2),
        vec![true],
        vec![0],
        vec![0, 1],
    )
    .unwrap();

    // min/max work through the float projection, the arg variants do not
    assert_eq!(matrix.major_max(false).unwrap(), vec![1.0]);
    assert!(matches!(
        matrix.major_argmax(),
        Err(SparseError::UnsupportedType { .. })
    ));
}

#[test]
fn test_reduction_on_non_canonical_input() {
    // Duplicates at (0,1) summing to 6; argmax must see the summed value
    let matrix = CompressedMatrix::from_parts(
        Format::Csr,
        (1, 3),
        vec![2.0, 4.0, 5.0],
        vec![1, 1, 2],
        vec![0, 3],
    )
    .unwrap();

    assert_eq!(matrix.major_argmax().unwrap(), vec![1]);
    assert_eq!(matrix.major_max(false).unwrap(), vec![6.0]);
}
