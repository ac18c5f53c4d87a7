//! Householder QR stored transposed
//!
//! Row `j` of the internal buffer is column `j` of the input, so each
//! reflector lies in one contiguous row. Suited to wide matrices and to
//! applying `Q` or `Q^H` to whole blocks of right-hand sides.

use super::helpers::{householder_column, rank1_update_mult_r};
use super::{DecompositionState, QrDecomposition};
use crate::error::{QrError, Result};
use crate::scalar::Scalar;
use crate::utils::dense::zeros;
use mdarray::DTensor;
use num_traits::Zero;

/// Householder QR with the packed factor kept as `A^T`
#[derive(Debug, Clone)]
pub struct HouseholderTran<T: Scalar> {
    /// `cols x rows` (or larger) buffer; row `j` is packed column `j`
    qr: DTensor<T, 2>,
    gammas: Vec<T::Real>,
    /// Reflector with its implicit one written out
    u: Vec<T>,
    scratch: Vec<T>,
    num_rows: usize,
    num_cols: usize,
    min_length: usize,
    error: bool,
    state: DecompositionState,
}

impl<T: Scalar> Default for HouseholderTran<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> HouseholderTran<T> {
    pub fn new() -> Self {
        Self {
            qr: zeros(0, 0),
            gammas: Vec::new(),
            u: Vec::new(),
            scratch: Vec::new(),
            num_rows: 0,
            num_cols: 0,
            min_length: 0,
            error: false,
            state: DecompositionState::Uninitialized,
        }
    }

    /// Factor `X` given ownership of `x_transposed = X^T`.
    ///
    /// The buffer becomes the packed factor and is overwritten in place;
    /// [`into_inner`](Self::into_inner) hands it back. Check
    /// [`state`](QrDecomposition::state) for degenerate columns.
    pub fn decompose_consuming(x_transposed: DTensor<T, 2>) -> Self {
        let (cols, rows) = *x_transposed.shape();
        let mut qr = Self::new();
        qr.qr = x_transposed;
        qr.set_dimensions(rows, cols);
        qr.factor();
        qr
    }

    /// Give back the packed buffer, `cols x rows` or larger
    pub fn into_inner(self) -> DTensor<T, 2> {
        self.qr
    }

    /// Size internal buffers for matrices up to `rows x cols`; never shrinks
    pub fn set_expected_max_size(&mut self, rows: usize, cols: usize) {
        let (cap_cols, cap_rows) = *self.qr.shape();
        if cols > cap_cols || rows > cap_rows {
            let new_cols = cols.max(cap_cols);
            let new_rows = rows.max(cap_rows);
            log::debug!(
                target: "householder_qr::qr",
                "transposed QR buffer grows to {}x{}",
                new_cols,
                new_rows
            );
            self.qr = zeros(new_cols, new_rows);
        }
        self.ensure_scratch(rows, cols);
    }

    fn ensure_scratch(&mut self, rows: usize, cols: usize) {
        let min = rows.min(cols);
        if self.gammas.len() < min {
            self.gammas.resize(min, T::Real::zero());
        }
        if self.u.len() < rows {
            self.u.resize(rows, T::zero());
        }
        let max = rows.max(cols);
        if self.scratch.len() < max {
            self.scratch.resize(max, T::zero());
        }
    }

    fn set_dimensions(&mut self, rows: usize, cols: usize) {
        self.set_expected_max_size(rows, cols);
        self.num_rows = rows;
        self.num_cols = cols;
        self.min_length = rows.min(cols);
    }

    fn factor(&mut self) {
        self.error = false;
        for j in 0..self.min_length {
            self.householder(j);
            self.update_a(j);
        }
        if self.error {
            log::warn!(
                target: "householder_qr::qr",
                "transposed householder: zero column while factoring {}x{} matrix",
                self.num_rows,
                self.num_cols
            );
        }
        self.state = DecompositionState::Decomposed {
            success: !self.error,
        };
    }

    /// Reflector `j` computed on a copy of row `j`, then written back
    fn householder(&mut self, j: usize) {
        let m = self.num_rows;
        for k in j..m {
            self.u[k] = self.qr[[j, k]];
        }
        match householder_column(&mut self.u, j, m) {
            Some(gamma) => self.gammas[j] = gamma,
            None => {
                self.gammas[j] = T::Real::zero();
                self.error = true;
            }
        }
        for k in j..m {
            self.qr[[j, k]] = self.u[k];
        }
    }

    /// Apply reflector `w`, held in `u`, to rows `w+1..cols` of the buffer
    fn update_a(&mut self, w: usize) {
        let (m, n) = (self.num_rows, self.num_cols);
        let gamma = self.gammas[w];
        if gamma == T::Real::zero() {
            return;
        }
        for row in (w + 1)..n {
            let mut val = self.qr[[row, w]];
            for k in (w + 1)..m {
                val += self.u[k].conjugate() * self.qr[[row, k]];
            }
            val = val.scale(gamma);
            self.qr[[row, w]] -= val;
            for k in (w + 1)..m {
                self.qr[[row, k]] -= self.u[k] * val;
            }
        }
    }

    /// Copy reflector `j` into `u` with the implicit one in place
    fn load_reflector(&mut self, j: usize) {
        self.u[j] = T::one();
        for k in (j + 1)..self.num_rows {
            self.u[k] = self.qr[[j, k]];
        }
    }

    fn check_block(&mut self, b: &DTensor<T, 2>) -> Result<()> {
        let (rows, cols) = *b.shape();
        if rows != self.num_rows {
            return Err(QrError::DimensionMismatch {
                context: "apply Q",
                expected: (self.num_rows, cols),
                found: (rows, cols),
            });
        }
        if self.scratch.len() < cols {
            self.scratch.resize(cols, T::zero());
        }
        Ok(())
    }

    /// `B := Q B` for a `rows x k` matrix
    pub fn apply_q(&mut self, b: &mut DTensor<T, 2>) -> Result<()> {
        self.check_block(b)?;
        let m = self.num_rows;
        for j in (0..self.min_length).rev() {
            let gamma = self.gammas[j];
            if gamma == T::Real::zero() {
                continue;
            }
            self.load_reflector(j);
            rank1_update_mult_r(b, &self.u, 0, gamma, 0, j, m, &mut self.scratch);
        }
        Ok(())
    }

    /// `B := Q^H B` for a `rows x k` matrix
    pub fn apply_q_tran(&mut self, b: &mut DTensor<T, 2>) -> Result<()> {
        self.check_block(b)?;
        let m = self.num_rows;
        for j in 0..self.min_length {
            let gamma = self.gammas[j];
            if gamma == T::Real::zero() {
                continue;
            }
            self.load_reflector(j);
            rank1_update_mult_r(b, &self.u, 0, gamma, 0, j, m, &mut self.scratch);
        }
        Ok(())
    }
}

impl<T: Scalar> QrDecomposition<T> for HouseholderTran<T> {
    fn decompose(&mut self, a: &DTensor<T, 2>) -> bool {
        let (m, n) = *a.shape();
        self.set_dimensions(m, n);
        for i in 0..m {
            for j in 0..n {
                self.qr[[j, i]] = a[[i, j]];
            }
        }
        self.factor();
        !self.error
    }

    fn shape(&self) -> (usize, usize) {
        (self.num_rows, self.num_cols)
    }

    fn gammas(&self) -> &[T::Real] {
        &self.gammas[..self.min_length]
    }

    fn state(&self) -> DecompositionState {
        self.state
    }

    fn accumulate_q(&mut self, q: &mut DTensor<T, 2>) {
        let m = self.num_rows;
        for j in (0..self.min_length).rev() {
            let gamma = self.gammas[j];
            if gamma == T::Real::zero() {
                continue;
            }
            self.load_reflector(j);
            rank1_update_mult_r(q, &self.u, 0, gamma, j, j, m, &mut self.scratch);
        }
    }

    fn r_entry(&self, i: usize, j: usize) -> T {
        self.qr[[j, i]]
    }
}
