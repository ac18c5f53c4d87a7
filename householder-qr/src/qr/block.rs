//! Blocked Householder QR with compact WY trailing updates
//!
//! Columns are factored in panels of `block_length`. The reflectors of a
//! panel are merged into `Q_b = I + W Y^H` and the trailing matrix is
//! updated once per panel as `A := A + Y (W^H A)`, which turns most of the
//! work into matrix-matrix products.

use super::helpers::{householder_column, rank1_update_mult_l, rank1_update_mult_r};
use super::{DecompositionState, QrDecomposition};
use crate::scalar::Scalar;
use crate::utils::dense::zeros;
use mdarray::DTensor;
use num_traits::Zero;

/// Panel width used when none is given
pub const DEFAULT_BLOCK_LENGTH: usize = 60;

/// Blocked Householder QR that factors in place in an owned matrix
#[derive(Debug, Clone)]
pub struct BlockHouseholder<T: Scalar> {
    factors: DTensor<T, 2>,
    gammas: Vec<T::Real>,
    block_length: usize,
    u: Vec<T>,
    scratch: Vec<T>,
    /// `W` of the current panel, row-major `(rows - j0) x panel width`
    w: Vec<T>,
    /// `Y^H y_c` or `W^H a` for the current panel
    dots: Vec<T>,
    num_rows: usize,
    num_cols: usize,
    min_length: usize,
    error: bool,
    state: DecompositionState,
}

impl<T: Scalar> Default for BlockHouseholder<T> {
    fn default() -> Self {
        Self::new(DEFAULT_BLOCK_LENGTH)
    }
}

impl<T: Scalar> BlockHouseholder<T> {
    /// `block_length` is clamped to at least one column
    pub fn new(block_length: usize) -> Self {
        Self {
            factors: zeros(0, 0),
            gammas: Vec::new(),
            block_length: block_length.max(1),
            u: Vec::new(),
            scratch: Vec::new(),
            w: Vec::new(),
            dots: Vec::new(),
            num_rows: 0,
            num_cols: 0,
            min_length: 0,
            error: false,
            state: DecompositionState::Uninitialized,
        }
    }

    pub fn block_length(&self) -> usize {
        self.block_length
    }

    /// Factor `a` in place, taking ownership of its storage
    pub fn decompose_consuming(&mut self, a: DTensor<T, 2>) -> bool {
        let (m, n) = *a.shape();
        self.factors = a;
        self.num_rows = m;
        self.num_cols = n;
        self.min_length = m.min(n);
        self.gammas.clear();
        self.gammas.resize(self.min_length, T::Real::zero());
        if self.u.len() < m {
            self.u.resize(m, T::zero());
        }
        if self.scratch.len() < m.max(n) {
            self.scratch.resize(m.max(n), T::zero());
        }

        self.error = false;
        let mut j0 = 0;
        while j0 < self.min_length {
            let p1 = (j0 + self.block_length).min(self.min_length);
            let j1 = (j0 + self.block_length).min(n);
            self.factor_panel(j0, p1, j1);
            if j1 < n {
                self.compute_w(j0, p1);
                self.update_trailing(j0, p1, j1);
            }
            j0 = p1;
        }

        if self.error {
            log::warn!(
                target: "householder_qr::qr",
                "block householder: zero column while factoring {}x{} matrix",
                m,
                n
            );
        }
        self.state = DecompositionState::Decomposed {
            success: !self.error,
        };
        !self.error
    }

    /// Packed factor in the layout of the input matrix
    pub fn into_inner(self) -> DTensor<T, 2> {
        self.factors
    }

    /// Unblocked factorization of columns `j0..p1`, updating panel columns up to `j1`
    fn factor_panel(&mut self, j0: usize, p1: usize, j1: usize) {
        let m = self.num_rows;
        for c in j0..p1 {
            for k in c..m {
                self.u[k] = self.factors[[k, c]];
            }
            let gamma = match householder_column(&mut self.u, c, m) {
                Some(g) => g,
                None => {
                    self.error = true;
                    T::Real::zero()
                }
            };
            self.gammas[c] = gamma;
            for k in c..m {
                self.factors[[k, c]] = self.u[k];
            }
            if gamma == T::Real::zero() {
                continue;
            }
            for col in (c + 1)..j1 {
                let mut val = self.factors[[c, col]];
                for k in (c + 1)..m {
                    val += self.u[k].conjugate() * self.factors[[k, col]];
                }
                val = val.scale(gamma);
                self.factors[[c, col]] -= val;
                for k in (c + 1)..m {
                    self.factors[[k, col]] -= self.u[k] * val;
                }
            }
        }
    }

    /// Entry `r` (absolute row) of reflector `c`, implicit one included
    #[inline]
    fn y(&self, r: usize, c: usize) -> T {
        if r < c {
            T::zero()
        } else if r == c {
            T::one()
        } else {
            self.factors[[r, c]]
        }
    }

    /// Build `W` so that `H_j0 ... H_(p1-1) = I + W Y^H`
    fn compute_w(&mut self, j0: usize, p1: usize) {
        let m = self.num_rows;
        let kb = p1 - j0;
        let rows = m - j0;
        self.w.clear();
        self.w.resize(rows * kb, T::zero());
        self.dots.clear();
        self.dots.resize(kb, T::zero());

        for c in 0..kb {
            let col = j0 + c;
            let gamma = self.gammas[col];

            // dots[p] = y_p^H y_c
            for p in 0..c {
                let mut sum = T::zero();
                for r in (j0 + c)..m {
                    sum += self.y(r, j0 + p).conjugate() * self.y(r, col);
                }
                self.dots[p] = sum;
            }

            // W(:, c) = -gamma (y_c + W(:, 0..c) dots)
            for r in 0..rows {
                let mut z = self.y(j0 + r, col);
                for p in 0..c {
                    z += self.w[r * kb + p] * self.dots[p];
                }
                self.w[r * kb + c] = -z.scale(gamma);
            }
        }
    }

    /// `A[j0.., j1..] := A + Y (W^H A)`
    fn update_trailing(&mut self, j0: usize, p1: usize, j1: usize) {
        let m = self.num_rows;
        let kb = p1 - j0;
        for col in j1..self.num_cols {
            for p in 0..kb {
                let mut sum = T::zero();
                for r in j0..m {
                    sum += self.w[(r - j0) * kb + p].conjugate() * self.factors[[r, col]];
                }
                self.dots[p] = sum;
            }
            for r in j0..m {
                let mut delta = T::zero();
                for p in 0..kb {
                    delta += self.y(r, j0 + p) * self.dots[p];
                }
                self.factors[[r, col]] += delta;
            }
        }
    }

    fn load_reflector(&mut self, j: usize) {
        self.u[j] = T::one();
        for k in (j + 1)..self.num_rows {
            self.u[k] = self.factors[[k, j]];
        }
    }
}

impl<T: Scalar> QrDecomposition<T> for BlockHouseholder<T> {
    fn decompose(&mut self, a: &DTensor<T, 2>) -> bool {
        self.decompose_consuming(a.clone())
    }

    fn shape(&self) -> (usize, usize) {
        (self.num_rows, self.num_cols)
    }

    fn gammas(&self) -> &[T::Real] {
        &self.gammas
    }

    fn state(&self) -> DecompositionState {
        self.state
    }

    /// The full `Q` is built left to right as `Q H_0 H_1 ...`; the compact one
    /// by applying reflectors right to left to the thin identity.
    fn accumulate_q(&mut self, q: &mut DTensor<T, 2>) {
        let m = self.num_rows;
        let full = q.shape().1 == m;
        if full {
            for j in 0..self.min_length {
                let gamma = self.gammas[j];
                if gamma == T::Real::zero() {
                    continue;
                }
                self.load_reflector(j);
                rank1_update_mult_l(q, &self.u, 0, gamma, 0, j, m);
            }
        } else {
            for j in (0..self.min_length).rev() {
                let gamma = self.gammas[j];
                if gamma == T::Real::zero() {
                    continue;
                }
                self.load_reflector(j);
                rank1_update_mult_r(q, &self.u, 0, gamma, j, j, m, &mut self.scratch);
            }
        }
    }

    fn r_entry(&self, i: usize, j: usize) -> T {
        self.factors[[i, j]]
    }
}
