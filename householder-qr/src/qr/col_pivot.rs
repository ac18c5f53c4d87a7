//! Rank-revealing Householder QR with column pivoting
//!
//! Before each step the remaining column with the largest residual norm is
//! swapped into place. Factoring stops once the largest remaining entry
//! drops below `threshold * max|A|`, which fixes the numerical rank.
//! The result satisfies `A P = Q R` with `R = [R11 R12; 0 0]`.

use super::column::HouseholderColumn;
use super::helpers::{apply_reflector, find_max, householder_with_max};
use super::{DecompositionState, QrDecomposition};
use crate::scalar::{RealScalar, Scalar};
use crate::utils::norms::{column_norm2, element_max_abs};
use crate::utils::dense::tabulate;
use crate::utils::pivoting::column_pivot_matrix;
use mdarray::DTensor;
use num_traits::{Float, Zero};

/// How residual column norms are maintained between steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormUpdate {
    /// Recompute every remaining norm after each step
    #[default]
    Recompute,
    /// Subtract the finished row and recompute only after heavy cancellation
    Downdate,
}

/// Column-pivoted Householder QR
#[derive(Debug, Clone)]
pub struct HouseholderColPiv<T: Scalar> {
    base: HouseholderColumn<T>,
    pivots: Vec<usize>,
    /// Squared residual norm of each column
    norms: Vec<T::Real>,
    /// Squared norm at the last full recomputation
    reference_norms: Vec<T::Real>,
    max_abs: T::Real,
    singular_threshold: Option<T::Real>,
    norm_update: NormUpdate,
    rank: usize,
}

impl<T: Scalar> Default for HouseholderColPiv<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> HouseholderColPiv<T> {
    pub fn new() -> Self {
        Self {
            base: HouseholderColumn::new(),
            pivots: Vec::new(),
            norms: Vec::new(),
            reference_norms: Vec::new(),
            max_abs: T::Real::zero(),
            singular_threshold: None,
            norm_update: NormUpdate::Recompute,
            rank: 0,
        }
    }

    /// Relative rank threshold; defaults to `eps * max(rows, cols)`
    pub fn with_singular_threshold(mut self, threshold: T::Real) -> Self {
        self.singular_threshold = Some(threshold);
        self
    }

    pub fn set_singular_threshold(&mut self, threshold: Option<T::Real>) {
        self.singular_threshold = threshold;
    }

    pub fn with_norm_update(mut self, norm_update: NormUpdate) -> Self {
        self.norm_update = norm_update;
        self
    }

    /// Threshold used by the last (or next) decomposition of a `rows x cols` matrix
    pub fn singular_threshold(&self, rows: usize, cols: usize) -> T::Real {
        self.singular_threshold
            .unwrap_or_else(|| T::Real::epsilon() * T::Real::from_usize(rows.max(cols)))
    }

    /// Numerical rank found by the last decomposition
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// `pivots[i]` is the original index of output column `i`
    pub fn col_pivots(&self) -> &[usize] {
        &self.pivots
    }

    /// Permutation matrix `P` with `A P = Q R`
    pub fn col_pivot_matrix(&self) -> DTensor<T, 2> {
        column_pivot_matrix(&self.pivots)
    }

    /// Packed column `j` of the pivoted factor
    pub fn reflector(&self, j: usize) -> &[T] {
        self.base.reflector(j)
    }

    /// `x := Q^H x` using the `rank` computed reflectors
    pub fn apply_q_tran_to(&self, x: &mut [T]) {
        for j in 0..self.rank {
            apply_reflector(self.base.reflector(j), j, self.base.gammas[j], x);
        }
    }

    /// Factors truncated to the detected rank: `Q` is `rows x rank`, `R` is `rank x cols`
    pub fn truncated(&mut self) -> (DTensor<T, 2>, DTensor<T, 2>) {
        let (m, n) = self.shape();
        let k = self.rank;
        let q_full = self.q(true);
        let q = tabulate(m, k, |i, j| q_full[[i, j]]);
        let r = tabulate(k, n, |i, j| if j >= i { self.r_entry(i, j) } else { T::zero() });
        (q, r)
    }

    fn setup_pivot_info(&mut self) {
        let (m, n) = (self.base.num_rows, self.base.num_cols);
        self.pivots.clear();
        self.pivots.extend(0..n);
        self.norms.clear();
        for j in 0..n {
            self.norms.push(column_norm2(&self.base.qr.column(j)[..m], 0));
        }
        self.reference_norms.clone_from(&self.norms);
    }

    /// Bring the residual norms of columns `j..cols` up to date for step `j`
    fn update_norms(&mut self, j: usize) {
        let (m, n) = (self.base.num_rows, self.base.num_cols);
        match self.norm_update {
            NormUpdate::Recompute => {
                for c in j..n {
                    self.norms[c] = column_norm2(&self.base.qr.column(c)[..m], j);
                }
            }
            NormUpdate::Downdate => {
                let sqrt_eps = T::Real::epsilon().sqrt();
                for c in j..n {
                    let col = &self.base.qr.column(c)[..m];
                    let mut v = self.norms[c] - col[j - 1].magnitude2();
                    if v <= sqrt_eps * self.reference_norms[c] {
                        v = column_norm2(col, j);
                        self.reference_norms[c] = v;
                    }
                    self.norms[c] = v;
                }
            }
        }
    }

    /// Move the remaining column with the largest norm into position `j`
    fn swap_columns(&mut self, j: usize) {
        let n = self.base.num_cols;
        let mut largest = j;
        let mut max = self.norms[j];
        for c in (j + 1)..n {
            if self.norms[c] > max {
                max = self.norms[c];
                largest = c;
            }
        }
        if largest != j {
            self.base.qr.swap_columns(j, largest);
            self.norms.swap(j, largest);
            self.reference_norms.swap(j, largest);
            self.pivots.swap(j, largest);
        }
    }

    /// Reflector for column `j`, or `false` once the residual is negligible
    fn householder_pivot(&mut self, j: usize, threshold: T::Real) -> bool {
        let m = self.base.num_rows;
        let u = self.base.qr.column_mut(j);
        let max = find_max(u, j, m - j);
        if max <= threshold * self.max_abs {
            return false;
        }
        self.base.gammas[j] = householder_with_max(u, j, m, max);
        true
    }
}

impl<T: Scalar> QrDecomposition<T> for HouseholderColPiv<T> {
    fn decompose(&mut self, a: &DTensor<T, 2>) -> bool {
        let (m, n) = *a.shape();
        self.base.set_dimensions(m, n);
        self.base.convert_to_column_major(a);
        self.max_abs = element_max_abs(a);
        self.setup_pivot_info();

        let threshold = self.singular_threshold(m, n);
        let min = self.base.min_length;
        self.rank = 0;
        for j in 0..min {
            if j > 0 {
                self.update_norms(j);
            }
            self.swap_columns(j);
            if !self.householder_pivot(j, threshold) {
                break;
            }
            self.base.update_a(j);
            self.rank = j + 1;
        }
        for gamma in &mut self.base.gammas[self.rank..min] {
            *gamma = T::Real::zero();
        }
        if self.rank < min {
            log::debug!(
                target: "householder_qr::qr",
                "column pivoting found rank {} for {}x{} matrix",
                self.rank,
                m,
                n
            );
        }

        self.base.error = false;
        self.base.state = DecompositionState::Decomposed { success: true };
        true
    }

    fn shape(&self) -> (usize, usize) {
        self.base.shape()
    }

    fn gammas(&self) -> &[T::Real] {
        self.base.gammas()
    }

    fn state(&self) -> DecompositionState {
        self.base.state
    }

    fn accumulate_q(&mut self, q: &mut DTensor<T, 2>) {
        let rank = self.rank;
        self.base.accumulate_reflectors(q, rank);
    }

    fn r_entry(&self, i: usize, j: usize) -> T {
        if i < self.rank {
            self.base.r_entry(i, j)
        } else {
            T::zero()
        }
    }
}

#[cfg(test)]
#[path = "col_pivot_tests.rs"]
mod tests;
