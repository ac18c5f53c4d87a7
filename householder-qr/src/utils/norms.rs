//! Vector and matrix norm computations

use crate::scalar::Scalar;
use mdarray::DTensor;
use num_traits::{Float, Zero};

/// Euclidean norm of a vector
pub fn norm_2<T: Scalar>(vec: &[T]) -> T::Real {
    let mut sum = T::Real::zero();
    for &x in vec {
        sum = sum + x.magnitude2();
    }
    sum.sqrt()
}

/// Frobenius norm of a matrix
pub fn norm_frobenius<T: Scalar>(mat: &DTensor<T, 2>) -> T::Real {
    let (m, n) = *mat.shape();
    let mut sum = T::Real::zero();
    for i in 0..m {
        for j in 0..n {
            sum = sum + mat[[i, j]].magnitude2();
        }
    }
    sum.sqrt()
}

/// Largest element magnitude of a matrix
pub fn element_max_abs<T: Scalar>(mat: &DTensor<T, 2>) -> T::Real {
    let (m, n) = *mat.shape();
    let mut max_val = T::Real::zero();
    for i in 0..m {
        for j in 0..n {
            let v = mat[[i, j]].magnitude();
            if v > max_val {
                max_val = v;
            }
        }
    }
    max_val
}

/// Squared 2-norm of `col[start..]`
pub fn column_norm2<T: Scalar>(col: &[T], start: usize) -> T::Real {
    let mut sum = T::Real::zero();
    for &x in &col[start..] {
        sum = sum + x.magnitude2();
    }
    sum
}
