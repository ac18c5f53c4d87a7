//! Back substitution for upper triangular systems

use crate::scalar::Scalar;
use crate::utils::dense::zeros;
use mdarray::DTensor;

/// Solve `R x = b` in place for the leading `n x n` block of `r`
pub fn solve_upper<T: Scalar>(r: &DTensor<T, 2>, x: &mut [T], n: usize) {
    solve_upper_with(|i, j| r[[i, j]], x, n);
}

/// Solve `R x = b` in place where `entry(i, j)` yields `R[i, j]` for `i <= j`
pub fn solve_upper_with<T, F>(entry: F, x: &mut [T], n: usize)
where
    T: Scalar,
    F: Fn(usize, usize) -> T,
{
    for i in (0..n).rev() {
        let mut sum = x[i];
        for j in (i + 1)..n {
            sum -= entry(i, j) * x[j];
        }
        x[i] = sum / entry(i, i);
    }
}

/// Solve `R x = b` in place with `R` read column by column.
///
/// `column(j)[i]` must return `R[i, j]` for `i <= j`; entries below the
/// diagonal are never read, so packed QR columns can be passed directly.
pub fn solve_upper_packed<'a, T, F>(column: F, x: &mut [T], n: usize)
where
    T: Scalar + 'a,
    F: Fn(usize) -> &'a [T],
{
    for j in (0..n).rev() {
        let col = column(j);
        x[j] = x[j] / col[j];
        let xj = x[j];
        for i in 0..j {
            x[i] -= col[i] * xj;
        }
    }
}

/// Inverse of the leading `n x n` block of a non-singular upper triangular `r`
pub fn invert_upper<T: Scalar>(r: &DTensor<T, 2>, n: usize) -> DTensor<T, 2> {
    let mut inv = zeros(n, n);
    let mut x = vec![T::zero(); n];
    for j in 0..n {
        x.iter_mut().for_each(|v| *v = T::zero());
        x[j] = T::one();
        solve_upper(r, &mut x, j + 1);
        for i in 0..=j {
            inv[[i, j]] = x[i];
        }
    }
    inv
}
