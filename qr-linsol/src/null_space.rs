//! Null space from the QR factorization of `A^H`

use crate::error::{Result, SolverError};
use householder_qr::utils::tabulate;
use householder_qr::{HouseholderTran, QrDecomposition, Scalar};
use mdarray::DTensor;

/// Orthonormal basis for the null space of `a` (`rows x cols`), returned as
/// the `count` columns of a `cols x count` matrix.
///
/// `a` is consumed: conjugated in place it holds `(A^H)^T`, so it becomes the
/// packed factor of `A^H` without a copy. The last `count` columns of the full
/// Q of `A^H` span the null space when `count <= cols - rank(A)`.
pub fn null_space<T: Scalar>(mut a: DTensor<T, 2>, count: usize) -> Result<DTensor<T, 2>> {
    let (rows, cols) = *a.shape();
    if count > cols {
        return Err(SolverError::NullSpaceSize {
            requested: count,
            available: cols,
        });
    }
    if !T::IS_REAL {
        for i in 0..rows {
            for j in 0..cols {
                a[[i, j]] = a[[i, j]].conjugate();
            }
        }
    }
    let mut qr = HouseholderTran::decompose_consuming(a);
    let q = qr.q(false);
    let first = cols - count;
    Ok(tabulate(cols, count, |i, j| q[[i, first + j]]))
}
