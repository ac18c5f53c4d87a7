//! Householder QR on a column-major copy of the input
//!
//! The input is copied once into contiguous columns so that computing a
//! reflector and applying it to the trailing columns both walk memory
//! sequentially. Suited to tall matrices.

use super::helpers::{apply_reflector, householder_column, rank1_update_mult_r};
use super::{DecompositionState, QrDecomposition, UnitHead};
use crate::parallelism::Parallelism;
use crate::scalar::Scalar;
use crate::workspace::Workspace;
use mdarray::DTensor;
use num_traits::Zero;
use rayon::prelude::*;

/// Column-major Householder QR
#[derive(Debug, Clone)]
pub struct HouseholderColumn<T: Scalar> {
    /// Packed factor, column `j` holds R above the diagonal and reflector `j` below
    pub(crate) qr: Workspace<T>,
    pub(crate) gammas: Vec<T::Real>,
    pub(crate) scratch: Vec<T>,
    pub(crate) num_rows: usize,
    pub(crate) num_cols: usize,
    pub(crate) min_length: usize,
    pub(crate) error: bool,
    pub(crate) state: DecompositionState,
    parallelism: Parallelism,
}

impl<T: Scalar> Default for HouseholderColumn<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> HouseholderColumn<T> {
    pub fn new() -> Self {
        Self {
            qr: Workspace::new(),
            gammas: Vec::new(),
            scratch: Vec::new(),
            num_rows: 0,
            num_cols: 0,
            min_length: 0,
            error: false,
            state: DecompositionState::Uninitialized,
            parallelism: Parallelism::None,
        }
    }

    /// Split trailing-column updates across the rayon pool
    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub fn parallelism(&self) -> Parallelism {
        self.parallelism
    }

    /// Size internal buffers for matrices up to `rows x cols`; never shrinks
    pub fn set_expected_max_size(&mut self, rows: usize, cols: usize) {
        self.qr.reserve(rows, cols);
        let min = rows.min(cols);
        if self.gammas.len() < min {
            self.gammas.resize(min, T::Real::zero());
        }
        let max = rows.max(cols);
        if self.scratch.len() < max {
            self.scratch.resize(max, T::zero());
        }
    }

    /// Packed column `j`: R entries on and above row `j`, reflector tail below
    pub fn reflector(&self, j: usize) -> &[T] {
        &self.qr.column(j)[..self.num_rows]
    }

    /// `x := Q^H x` for a vector of length `rows`
    pub fn apply_q_tran_to(&self, x: &mut [T]) {
        for j in 0..self.min_length {
            apply_reflector(self.reflector(j), j, self.gammas[j], x);
        }
    }

    /// `x := Q x` for a vector of length `rows`
    pub fn apply_q_to(&self, x: &mut [T]) {
        for j in (0..self.min_length).rev() {
            apply_reflector(self.reflector(j), j, self.gammas[j], x);
        }
    }

    pub(crate) fn convert_to_column_major(&mut self, a: &DTensor<T, 2>) {
        for j in 0..self.num_cols {
            let col = self.qr.column_mut(j);
            for (i, v) in col.iter_mut().take(self.num_rows).enumerate() {
                *v = a[[i, j]];
            }
        }
    }

    pub(crate) fn set_dimensions(&mut self, rows: usize, cols: usize) {
        self.set_expected_max_size(rows, cols);
        self.num_rows = rows;
        self.num_cols = cols;
        self.min_length = rows.min(cols);
    }

    /// Compute reflector `j` from the current contents of column `j`
    fn householder(&mut self, j: usize) {
        let u = self.qr.column_mut(j);
        match householder_column(u, j, self.num_rows) {
            Some(gamma) => self.gammas[j] = gamma,
            None => {
                self.gammas[j] = T::Real::zero();
                self.error = true;
            }
        }
    }

    /// Apply reflector `w` to columns `w+1..cols`
    pub(crate) fn update_a(&mut self, w: usize) {
        let (m, n) = (self.num_rows, self.num_cols);
        let gamma = self.gammas[w];
        if w + 1 >= n || gamma == T::Real::zero() {
            return;
        }
        let stride = self.qr.stride();
        let (u, trailing) = self.qr.column_and_trailing_mut(w, w + 1, n);
        let u = &u[..m];

        if self.parallelism.should_split((n - w - 1) * (m - w)) {
            trailing
                .par_chunks_mut(stride)
                .for_each(|col| apply_reflector(u, w, gamma, &mut col[..m]));
        } else {
            for col in trailing.chunks_mut(stride) {
                apply_reflector(u, w, gamma, &mut col[..m]);
            }
        }
    }

    pub(crate) fn finish(&mut self, context: &str) -> bool {
        if self.error {
            log::warn!(
                target: "householder_qr::qr",
                "{}: zero column while factoring {}x{} matrix",
                context,
                self.num_rows,
                self.num_cols
            );
        }
        self.state = DecompositionState::Decomposed {
            success: !self.error,
        };
        !self.error
    }

    /// Apply the first `count` reflectors in reverse order to `q`
    pub(crate) fn accumulate_reflectors(&mut self, q: &mut DTensor<T, 2>, count: usize) {
        let m = self.num_rows;
        for j in (0..count).rev() {
            let gamma = self.gammas[j];
            if gamma == T::Real::zero() {
                continue;
            }
            let head = UnitHead::new(&mut self.qr.column_mut(j)[..m], j);
            rank1_update_mult_r(q, head.as_slice(), 0, gamma, j, j, m, &mut self.scratch);
        }
    }
}

impl<T: Scalar> QrDecomposition<T> for HouseholderColumn<T> {
    fn decompose(&mut self, a: &DTensor<T, 2>) -> bool {
        let (m, n) = *a.shape();
        self.set_dimensions(m, n);
        self.convert_to_column_major(a);

        self.error = false;
        for j in 0..self.min_length {
            self.householder(j);
            self.update_a(j);
        }
        self.finish("column householder")
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
        let count = self.min_length;
        self.accumulate_reflectors(q, count);
    }

    fn r_entry(&self, i: usize, j: usize) -> T {
        self.qr.column(j)[i]
    }
}
