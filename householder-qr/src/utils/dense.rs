//! Dense helpers over `DTensor<T, 2>`

use crate::scalar::Scalar;
use mdarray::DTensor;

/// `rows x cols` matrix of zeros
pub fn zeros<T: Scalar>(rows: usize, cols: usize) -> DTensor<T, 2> {
    DTensor::<T, 2>::from_elem([rows, cols], T::zero())
}

/// `rows x cols` matrix with entry `(i, j)` set to `f(i, j)`
///
/// Filled column by column over a zeroed buffer, so either dimension may be 0.
pub fn tabulate<T: Scalar, F: FnMut(usize, usize) -> T>(
    rows: usize,
    cols: usize,
    mut f: F,
) -> DTensor<T, 2> {
    let mut out = zeros(rows, cols);
    for j in 0..cols {
        for i in 0..rows {
            out[[i, j]] = f(i, j);
        }
    }
    out
}

/// `rows x cols` matrix with ones on the main diagonal
pub fn identity<T: Scalar>(rows: usize, cols: usize) -> DTensor<T, 2> {
    tabulate(rows, cols, |i, j| if i == j { T::one() } else { T::zero() })
}

/// Overwrite `a` with the identity pattern, keeping its shape
pub fn set_identity<T: Scalar>(a: &mut DTensor<T, 2>) {
    let (m, n) = *a.shape();
    for i in 0..m {
        for j in 0..n {
            a[[i, j]] = if i == j { T::one() } else { T::zero() };
        }
    }
}

/// Build a matrix from row slices; all rows must have the same length
pub fn from_rows<T: Scalar, R: AsRef<[T]>>(rows: &[R]) -> DTensor<T, 2> {
    let m = rows.len();
    let n = rows.first().map_or(0, |r| r.as_ref().len());
    tabulate(m, n, |i, j| rows[i].as_ref()[j])
}

/// `C = A B`
///
/// # Panics
/// Panics if the inner dimensions disagree.
pub fn matmul<T: Scalar>(a: &DTensor<T, 2>, b: &DTensor<T, 2>) -> DTensor<T, 2> {
    let (m, k) = *a.shape();
    let (k2, n) = *b.shape();
    assert_eq!(k, k2, "inner dimensions must agree: {} vs {}", k, k2);

    let mut c = zeros(m, n);
    for i in 0..m {
        for p in 0..k {
            let aip = a[[i, p]];
            if aip == T::zero() {
                continue;
            }
            for j in 0..n {
                c[[i, j]] += aip * b[[p, j]];
            }
        }
    }
    c
}

/// Conjugate transpose `A^H` (plain transpose for real scalars)
pub fn conj_transpose<T: Scalar>(a: &DTensor<T, 2>) -> DTensor<T, 2> {
    let (m, n) = *a.shape();
    tabulate(n, m, |i, j| a[[j, i]].conjugate())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_matmul_rectangular() {
        let a = from_rows::<f64, _>(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        let b = from_rows::<f64, _>(&[[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]);
        let c = matmul(&a, &b);
        assert_eq!(*c.shape(), (2, 2));
        assert_abs_diff_eq!(c[[0, 0]], 4.0, epsilon = 1e-14);
        assert_abs_diff_eq!(c[[0, 1]], 5.0, epsilon = 1e-14);
        assert_abs_diff_eq!(c[[1, 0]], 10.0, epsilon = 1e-14);
        assert_abs_diff_eq!(c[[1, 1]], 11.0, epsilon = 1e-14);
    }

    #[test]
    fn test_identity_wide() {
        let i = identity::<f64>(2, 4);
        assert_eq!(i[[1, 1]], 1.0);
        assert_eq!(i[[1, 3]], 0.0);
        let mut z = zeros::<f64>(3, 2);
        set_identity(&mut z);
        assert_eq!(z[[0, 0]], 1.0);
        assert_eq!(z[[2, 1]], 0.0);
    }

    #[test]
    fn test_empty_shapes() {
        let empty = tabulate::<f64, _>(0, 3, |_, _| 1.0);
        assert_eq!(*empty.shape(), (0, 3));
        let t = conj_transpose(&zeros::<f64>(4, 0));
        assert_eq!(*t.shape(), (0, 4));
        assert_eq!(*identity::<f64>(0, 2).shape(), (0, 2));
    }
}
