//! One-sided (Hestenes) Jacobi SVD for real matrices

use crate::scalar::RealScalar;
use crate::utils::dense::{conj_transpose, identity, tabulate, zeros};
use log::debug;
use mdarray::DTensor;

/// Sweep limit; convergence is quadratic so this is never reached in practice
const MAX_SWEEPS: usize = 60;

/// Thin SVD `A = U diag(s) V^T`
#[derive(Debug, Clone)]
pub struct SvdResult<T: RealScalar> {
    /// Left singular vectors (m × k), orthonormal also for rank-deficient input
    pub u: DTensor<T, 2>,
    /// Singular values in non-increasing order (k)
    pub s: Vec<T>,
    /// Right singular vectors (n × k)
    pub v: DTensor<T, 2>,
}

/// Plane rotation `[c s; -s c]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JacobiRotation<T: RealScalar> {
    pub c: T,
    pub s: T,
}

impl<T: RealScalar> JacobiRotation<T> {
    pub fn new(c: T, s: T) -> Self {
        Self { c, s }
    }

    pub fn identity() -> Self {
        Self {
            c: T::one(),
            s: T::zero(),
        }
    }

    pub fn transpose(&self) -> Self {
        Self {
            c: self.c,
            s: -self.s,
        }
    }

    /// Rotation that diagonalizes the symmetric 2×2 Gram matrix
    /// `[[alpha, gamma], [gamma, beta]]`
    pub fn from_gram(alpha: T, beta: T, gamma: T) -> Self {
        if gamma == T::zero() {
            return Self::identity();
        }
        let two = T::from_f64(2.0);
        let zeta = (beta - alpha) / (two * gamma);
        let sign = if zeta >= T::zero() { T::one() } else { -T::one() };
        let t = sign / (zeta.abs() + (T::one() + zeta * zeta).sqrt());
        let c = T::one() / (T::one() + t * t).sqrt();
        Self::new(c, c * t)
    }

    /// Replace columns `p` and `q` of `m` by `c m_p - s m_q` and `s m_p + c m_q`
    pub fn apply_right(&self, m: &mut DTensor<T, 2>, p: usize, q: usize) {
        let rows = m.shape().0;
        for i in 0..rows {
            let mp = m[[i, p]];
            let mq = m[[i, q]];
            m[[i, p]] = self.c * mp - self.s * mq;
            m[[i, q]] = self.s * mp + self.c * mq;
        }
    }
}

fn column_dot<T: RealScalar>(m: &DTensor<T, 2>, p: usize, q: usize) -> T {
    let rows = m.shape().0;
    (0..rows).fold(T::zero(), |acc, i| acc + m[[i, p]] * m[[i, q]])
}

/// Thin SVD of `a` by orthogonalizing its columns with plane rotations
pub fn jacobi_svd<T: RealScalar>(a: &DTensor<T, 2>) -> SvdResult<T> {
    let (m, n) = *a.shape();
    if m < n {
        let SvdResult { u, s, v } = jacobi_svd(&conj_transpose(a));
        return SvdResult { u: v, s, v: u };
    }

    let mut u = a.clone();
    let mut v = identity::<T>(n, n);
    let eps = T::epsilon();

    let mut converged = n < 2;
    for sweep in 0..MAX_SWEEPS {
        let mut rotated = false;
        for p in 0..n.saturating_sub(1) {
            for q in (p + 1)..n {
                let alpha = column_dot(&u, p, p);
                let beta = column_dot(&u, q, q);
                let gamma = column_dot(&u, p, q);
                if gamma.abs() <= eps * (alpha * beta).sqrt() {
                    continue;
                }
                let rot = JacobiRotation::from_gram(alpha, beta, gamma);
                rot.apply_right(&mut u, p, q);
                rot.apply_right(&mut v, p, q);
                rotated = true;
            }
        }
        if !rotated {
            debug!(target: "householder_qr::svd", "jacobi converged after {} sweeps", sweep);
            converged = true;
            break;
        }
    }
    if !converged {
        debug!(target: "householder_qr::svd", "jacobi stopped after {} sweeps", MAX_SWEEPS);
    }

    let mut s: Vec<T> = (0..n).map(|j| column_dot(&u, j, j).sqrt()).collect();
    for (j, &sj) in s.iter().enumerate() {
        if sj > T::zero() {
            for i in 0..m {
                u[[i, j]] = u[[i, j]] / sj;
            }
        }
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&x, &y| s[y].partial_cmp(&s[x]).unwrap_or(std::cmp::Ordering::Equal));
    let mut u_sorted = tabulate(m, n, |i, j| u[[i, order[j]]]);
    let v_sorted = tabulate(n, n, |i, j| v[[i, order[j]]]);
    s = order.iter().map(|&j| s[j]).collect();
    let cutoff = s.first().map_or(T::zero(), |&s0| s0 * eps * T::from_usize(16 * m));
    let nonzero = s.iter().take_while(|&&sj| sj > cutoff).count();
    complete_orthonormal(&mut u_sorted, nonzero);

    SvdResult {
        u: u_sorted,
        s,
        v: v_sorted,
    }
}

/// Replace columns `first..` of `u` with unit vectors orthogonal to every
/// column before them, drawn from the canonical basis by Gram-Schmidt.
fn complete_orthonormal<T: RealScalar>(u: &mut DTensor<T, 2>, first: usize) {
    let (m, n) = *u.shape();
    let half = <T as RealScalar>::from_f64(0.5);
    let mut candidate = 0;
    for j in first..n {
        while candidate < m {
            let mut e = vec![T::zero(); m];
            e[candidate] = T::one();
            candidate += 1;
            // two passes keep the result orthogonal to working precision
            for _ in 0..2 {
                for p in 0..j {
                    let dot = (0..m).fold(T::zero(), |acc, i| acc + u[[i, p]] * e[i]);
                    for (i, ei) in e.iter_mut().enumerate() {
                        *ei = *ei - dot * u[[i, p]];
                    }
                }
            }
            let norm = e.iter().fold(T::zero(), |acc, &x| acc + x * x).sqrt();
            if norm > half {
                for (i, &ei) in e.iter().enumerate() {
                    u[[i, j]] = ei / norm;
                }
                break;
            }
        }
    }
}

impl<T: RealScalar> SvdResult<T> {
    /// Number of singular values above `rtol * s[0]`
    pub fn rank(&self, rtol: T) -> usize {
        let cutoff = self.s.first().map_or(T::zero(), |&s0| rtol * s0);
        self.s.iter().filter(|&&s| s > cutoff).count()
    }

    /// Moore-Penrose pseudo-inverse, dropping singular values at or below `rtol * s[0]`
    pub fn pseudo_inverse(&self, rtol: T) -> DTensor<T, 2> {
        let m = self.u.shape().0;
        let n = self.v.shape().0;
        let rank = self.rank(rtol);
        let mut pinv = zeros(n, m);
        for k in 0..rank {
            let inv = T::one() / self.s[k];
            for i in 0..n {
                let vik = self.v[[i, k]] * inv;
                for j in 0..m {
                    pinv[[i, j]] += vik * self.u[[j, k]];
                }
            }
        }
        pinv
    }
}
