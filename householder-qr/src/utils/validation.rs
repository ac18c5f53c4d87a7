//! Result validation utilities

use crate::scalar::Scalar;
use crate::utils::dense::matmul;
use crate::utils::norms::norm_frobenius;
use mdarray::DTensor;
use num_traits::Zero;

/// Check that the columns of `matrix` are orthonormal, `M^H M = I`
pub fn is_unitary<T: Scalar>(matrix: &DTensor<T, 2>, tolerance: T::Real) -> bool {
    let (m, k) = *matrix.shape();
    for i in 0..k {
        for j in 0..k {
            let mut sum = T::zero();
            for row in 0..m {
                sum += matrix[[row, i]].conjugate() * matrix[[row, j]];
            }
            let expected = if i == j { T::one() } else { T::zero() };
            if (sum - expected).magnitude() > tolerance {
                return false;
            }
        }
    }
    true
}

/// Check that every entry strictly below the diagonal is zero
pub fn is_upper_triangular<T: Scalar>(matrix: &DTensor<T, 2>) -> bool {
    let (m, n) = *matrix.shape();
    (0..m).all(|i| (0..n.min(i)).all(|j| matrix[[i, j]] == T::zero()))
}

/// Relative reconstruction error `||A - Q R||_F / ||A||_F`
///
/// An all-zero `A` is compared absolutely.
pub fn reconstruction_error<T: Scalar>(
    a: &DTensor<T, 2>,
    q: &DTensor<T, 2>,
    r: &DTensor<T, 2>,
) -> T::Real {
    let qr = matmul(q, r);
    let (m, n) = *a.shape();
    let mut diff = a.clone();
    for i in 0..m {
        for j in 0..n {
            diff[[i, j]] -= qr[[i, j]];
        }
    }
    let scale = norm_frobenius(a);
    let err = norm_frobenius(&diff);
    if scale > T::Real::zero() {
        err / scale
    } else {
        err
    }
}
