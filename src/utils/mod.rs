//! Utility functions and helpers

pub mod formats;

pub use formats::{from_sprs, to_sprs};

/// Computes an exclusive prefix sum (scan) for a vector
///
/// `result[i]` is the sum of `input[..i]`; the final element is the total.
pub fn exclusive_scan(input: &[usize]) -> Vec<usize> {
    let mut result = Vec::with_capacity(input.len() + 1);
    let mut sum = 0;

    result.push(0); // First element is always 0

    for &val in input {
        sum += val;
        result.push(sum);
    }

    result
}

/// Splits a slice into per-row sub-slices according to an indptr-style
/// pointer array (`ptr.len() == n_rows + 1`, monotone, `ptr[0] == 0`).
///
/// Each returned slice covers `[ptr[r], ptr[r+1])` and is independently
/// mutable, so rayon can hand one row to each parallel task.
pub(crate) fn split_by_ptr<'a, X>(ptr: &[usize], slice: &'a mut [X]) -> Vec<&'a mut [X]> {
    let mut out = Vec::with_capacity(ptr.len().saturating_sub(1));
    let mut rest = slice;

    for w in ptr.windows(2) {
        let (head, tail) = rest.split_at_mut(w[1] - w[0]);
        out.push(head);
        rest = tail;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclusive_scan() {
        let input = vec![1, 2, 3, 4];
        let expected = vec![0, 1, 3, 6, 10];
        assert_eq!(exclusive_scan(&input), expected);

        let input = vec![0, 0, 5, 0];
        let expected = vec![0, 0, 0, 5, 5];
        assert_eq!(exclusive_scan(&input), expected);
    }

    #[test]
    fn test_split_by_ptr() {
        let ptr = vec![0, 2, 2, 5];
        let mut data = vec![10, 20, 30, 40, 50];

        let rows = split_by_ptr(&ptr, &mut data);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], &[10, 20]);
        assert!(rows[1].is_empty());
        assert_eq!(rows[2], &[30, 40, 50]);
    }
}
