//! Householder reflector kernels shared by every QR variant
//!
//! A reflector is stored scale-normalized with an implicit leading one:
//! for column `j` the vector is `v = [1, u[j+1], ..., u[m-1]]` and the
//! transform is `H = I - gamma v v^H` with a real `gamma` in `[1, 2]`.
//! Routines taking a raw `u` slice read `u[start]` as stored, so callers
//! must place the one there first.

use crate::scalar::Scalar;
use mdarray::DTensor;
use num_traits::{Float, One, Zero};

/// Largest magnitude among `u[start..start + length]`
///
/// Returns zero for an empty or all-zero range.
pub fn find_max<T: Scalar>(u: &[T], start: usize, length: usize) -> T::Real {
    let mut max = T::Real::zero();
    for &x in &u[start..start + length] {
        let v = x.magnitude();
        if v > max {
            max = v;
        }
    }
    max
}

/// Scale `x[start..stop]` by `1/max` and compute the signed norm `tau`
///
/// `tau` carries the phase of the leading element so that `x0 + tau` never
/// cancels; a zero leading element takes `tau = +nx`. Returns
/// `(tau, gamma)` with `gamma = (nx + |x0|) / nx`, both relative to the
/// scaled vector. `max` must be positive.
pub fn compute_tau_and_divide<T: Scalar>(
    start: usize,
    stop: usize,
    x: &mut [T],
    max: T::Real,
) -> (T, T::Real) {
    let mut norm2 = T::Real::zero();
    for v in &mut x[start..stop] {
        *v = v.unscale(max);
        norm2 = norm2 + v.magnitude2();
    }
    let nx = norm2.sqrt();

    let x0 = x[start];
    let mag_x0 = x0.magnitude();
    let tau = if mag_x0 == T::Real::zero() {
        T::from_real(nx)
    } else {
        x0.scale(nx / mag_x0)
    };
    let gamma = T::Real::one() + mag_x0 / nx;
    (tau, gamma)
}

/// `u[start..stop] /= u0`
pub fn divide_elements<T: Scalar>(start: usize, stop: usize, u: &mut [T], u0: T) {
    for v in &mut u[start..stop] {
        *v = *v / u0;
    }
}

/// Turn `u[start..stop]` into a packed reflector given its largest magnitude.
///
/// On return `u[start]` holds the R diagonal entry `-tau * max` and
/// `u[start+1..stop]` the reflector tail. Returns `gamma`.
pub fn householder_with_max<T: Scalar>(
    u: &mut [T],
    start: usize,
    stop: usize,
    max: T::Real,
) -> T::Real {
    let (tau, gamma) = compute_tau_and_divide(start, stop, u, max);
    let u0 = u[start] + tau;
    divide_elements(start + 1, stop, u, u0);
    u[start] = -tau.scale(max);
    gamma
}

/// Packed reflector for `u[start..stop]`, or `None` when the range is all zero
pub fn householder_column<T: Scalar>(u: &mut [T], start: usize, stop: usize) -> Option<T::Real> {
    let max = find_max(u, start, stop - start);
    if max == T::Real::zero() {
        None
    } else {
        Some(householder_with_max(u, start, stop, max))
    }
}

/// Apply a packed reflector to a vector, `x := (I - gamma v v^H) x`
///
/// `u` is the packed column whose reflector starts at row `j`; `u[j]` is not
/// read. Only `x[j..]` changes.
#[inline]
pub fn apply_reflector<T: Scalar>(u: &[T], j: usize, gamma: T::Real, x: &mut [T]) {
    let n = x.len();
    let mut val = x[j];
    for k in (j + 1)..n {
        val += u[k].conjugate() * x[k];
    }
    val = val.scale(gamma);
    x[j] -= val;
    for k in (j + 1)..n {
        x[k] -= u[k] * val;
    }
}

/// Left rank-1 update, `A := (I - gamma u u^H) A`
///
/// Restricted to rows `w0..w1` and columns `col_a0..`. The reflector entry
/// for row `i` is `u[i + offset_u]`. `scratch` needs one slot per column of
/// `A`. The row vector `gamma u^H A` is formed first so that `A` is swept
/// row by row.
#[allow(clippy::too_many_arguments)]
pub fn rank1_update_mult_r<T: Scalar>(
    a: &mut DTensor<T, 2>,
    u: &[T],
    offset_u: usize,
    gamma: T::Real,
    col_a0: usize,
    w0: usize,
    w1: usize,
    scratch: &mut [T],
) {
    let n = a.shape().1;
    if w0 >= w1 || col_a0 >= n {
        return;
    }

    let u0 = u[w0 + offset_u].conjugate();
    for i in col_a0..n {
        scratch[i] = u0 * a[[w0, i]];
    }
    for k in (w0 + 1)..w1 {
        let uk = u[k + offset_u].conjugate();
        for i in col_a0..n {
            scratch[i] += uk * a[[k, i]];
        }
    }
    for s in &mut scratch[col_a0..n] {
        *s = s.scale(gamma);
    }

    for i in w0..w1 {
        let ui = u[i + offset_u];
        for j in col_a0..n {
            a[[i, j]] -= ui * scratch[j];
        }
    }
}

/// Right rank-1 update, `A := A (I - gamma u u^H)`
///
/// Restricted to rows `row_a0..` and columns `w0..w1`; the reflector entry
/// for column `j` is `u[j + offset_u]`.
pub fn rank1_update_mult_l<T: Scalar>(
    a: &mut DTensor<T, 2>,
    u: &[T],
    offset_u: usize,
    gamma: T::Real,
    row_a0: usize,
    w0: usize,
    w1: usize,
) {
    let m = a.shape().0;
    for i in row_a0..m {
        let mut sum = T::zero();
        for j in w0..w1 {
            sum += a[[i, j]] * u[j + offset_u];
        }
        sum = -sum.scale(gamma);
        for j in w0..w1 {
            a[[i, j]] += sum * u[j + offset_u].conjugate();
        }
    }
}

#[cfg(test)]
#[path = "helpers_tests.rs"]
mod tests;
