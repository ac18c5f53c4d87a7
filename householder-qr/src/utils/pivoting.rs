//! Column pivoting utilities

use crate::scalar::Scalar;
use crate::utils::dense::tabulate;
use mdarray::DTensor;

/// Permute the columns of a matrix
///
/// Column `j` of the result is column `permutation[j]` of the input, so the
/// result equals `A P` for the matrix returned by [`column_pivot_matrix`].
///
/// # Panics
/// Panics if `permutation.len()` differs from the column count.
pub fn apply_column_permutation<T: Scalar>(
    matrix: &DTensor<T, 2>,
    permutation: &[usize],
) -> DTensor<T, 2> {
    let (m, n) = *matrix.shape();
    assert_eq!(permutation.len(), n);
    tabulate(m, n, |i, j| matrix[[i, permutation[j]]])
}

/// Create the column pivot matrix `P` with `P[p[i], i] = 1`
pub fn column_pivot_matrix<T: Scalar>(permutation: &[usize]) -> DTensor<T, 2> {
    let n = permutation.len();
    let mut p = DTensor::<T, 2>::from_elem([n, n], T::zero());
    for (i, &src) in permutation.iter().enumerate() {
        p[[src, i]] = T::one();
    }
    p
}

/// Invert a permutation vector, `inv[p[i]] = i`
pub fn invert_permutation(permutation: &[usize]) -> Vec<usize> {
    let mut inv = vec![0; permutation.len()];
    for (i, &p) in permutation.iter().enumerate() {
        inv[p] = i;
    }
    inv
}
