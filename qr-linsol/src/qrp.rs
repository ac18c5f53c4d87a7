//! Rank-deficient least squares from column-pivoted QR
//!
//! With `A P = Q [R11 R12; 0 0]` and `rank` columns in `R11`, the basic
//! solution back-substitutes through `R11` and sets the free variables to
//! zero. The minimum-norm solution removes from it the component lying in
//! the range of `W = [R11^-1 R12; -I]`, which spans the null space of the
//! permuted system.

use crate::error::Result;
use crate::solver::{column_of, prepare_solution, triangular_quality, LinearSolver, SystemStatus};
use householder_qr::triangular::{invert_upper, solve_upper_packed, solve_upper_with};
use householder_qr::utils::{tabulate, zeros};
use householder_qr::{HouseholderColPiv, HouseholderColumn, QrDecomposition, RealScalar, Scalar};
use mdarray::DTensor;

/// Options of the pivoted solver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QrpConfig {
    /// Return the minimum 2-norm solution instead of the basic one
    pub minimum_norm: bool,
    /// Relative rank threshold; `None` keeps `eps * max(rows, cols)`
    pub singular_threshold: Option<f64>,
}

impl Default for QrpConfig {
    fn default() -> Self {
        Self {
            minimum_norm: true,
            singular_threshold: None,
        }
    }
}

/// Solver for rank-deficient, tall or wide systems
#[derive(Debug, Clone)]
pub struct QrpSolver<T: Scalar> {
    decomposer: HouseholderColPiv<T>,
    minimum_norm: bool,
    /// Null-space generator of the permuted system, `cols x (cols - rank)`
    w: DTensor<T, 2>,
    w_qr: HouseholderColumn<T>,
    status: SystemStatus,
}

impl<T: Scalar> QrpSolver<T> {
    pub fn new(minimum_norm: bool) -> Self {
        Self {
            decomposer: HouseholderColPiv::new(),
            minimum_norm,
            w: zeros(0, 0),
            w_qr: HouseholderColumn::new(),
            status: SystemStatus::Empty,
        }
    }

    pub fn from_config(config: QrpConfig) -> Self {
        let mut solver = Self::new(config.minimum_norm);
        solver
            .decomposer
            .set_singular_threshold(config.singular_threshold.map(<T::Real as RealScalar>::from_f64));
        solver
    }

    pub fn with_singular_threshold(mut self, threshold: T::Real) -> Self {
        self.decomposer.set_singular_threshold(Some(threshold));
        self
    }

    pub fn is_minimum_norm(&self) -> bool {
        self.minimum_norm
    }

    /// Numerical rank found by the last `set_a`
    pub fn rank(&self) -> usize {
        self.decomposer.rank()
    }

    pub fn decomposer(&self) -> &HouseholderColPiv<T> {
        &self.decomposer
    }

    fn needs_null_space_pass(&self, cols: usize) -> bool {
        self.minimum_norm && self.rank() < cols
    }

    /// Build `W` and factor it for the least-squares projection
    fn build_null_space_basis(&mut self, cols: usize) {
        let rank = self.rank();
        let free = cols - rank;
        let d = &self.decomposer;
        let r11 = tabulate(rank, rank, |i, j| if j >= i { d.r_entry(i, j) } else { T::zero() });
        let r11_inv = invert_upper(&r11, rank);
        self.w = tabulate(cols, free, |i, j| {
            if i < rank {
                (i..rank).fold(T::zero(), |acc, k| acc + r11_inv[[i, k]] * d.r_entry(k, rank + j))
            } else if i - rank == j {
                -T::one()
            } else {
                T::zero()
            }
        });
        // the -I block keeps W at full column rank
        self.w_qr.decompose(&self.w);
    }

    fn solve_column(&self, b: &DTensor<T, 2>, c: usize, cols: usize) -> Vec<T> {
        let rank = self.rank();
        let d = &self.decomposer;

        let mut y = column_of(b, c);
        d.apply_q_tran_to(&mut y);
        let mut z = vec![T::zero(); cols];
        z[..rank].copy_from_slice(&y[..rank]);
        solve_upper_with(|i, j| d.r_entry(i, j), &mut z, rank);

        if self.needs_null_space_pass(cols) {
            let free = cols - rank;
            let mut t = z.clone();
            self.w_qr.apply_q_tran_to(&mut t);
            solve_upper_packed(|j| self.w_qr.reflector(j), &mut t, free);
            for (i, zi) in z.iter_mut().enumerate() {
                for (j, &tj) in t.iter().take(free).enumerate() {
                    *zi -= self.w[[i, j]] * tj;
                }
            }
        }

        let mut x = vec![T::zero(); cols];
        for (&p, &v) in d.col_pivots().iter().zip(z.iter()) {
            x[p] = v;
        }
        x
    }
}

impl<T: Scalar> LinearSolver<T> for QrpSolver<T> {
    fn set_a(&mut self, a: &DTensor<T, 2>) -> Result<bool> {
        let (rows, cols) = *a.shape();
        self.decomposer.decompose(a);
        if self.needs_null_space_pass(cols) {
            self.build_null_space_basis(cols);
        }
        self.status = SystemStatus::after_decompose(rows, cols, true);
        Ok(true)
    }

    /// Solve `A x = b` column by column in the least-squares sense
    ///
    /// Only the leading `rank` pivots are used. The remaining unknowns are
    /// zero for the basic solution; with `minimum_norm` they are chosen to
    /// minimize `||x||` over all least-squares solutions.
    ///
    /// # Arguments
    /// * `b` - Right-hand sides, `rows x k`
    /// * `x` - Output, reshaped to `cols x k` if needed
    fn solve(&mut self, b: &DTensor<T, 2>, x: &mut DTensor<T, 2>) -> Result<()> {
        let (rows, cols) = self.status.ready()?;
        let k = prepare_solution(b, rows, cols, x)?;
        for c in 0..k {
            let solution = self.solve_column(b, c, cols);
            for (j, v) in solution.into_iter().enumerate() {
                x[[j, c]] = v;
            }
        }
        Ok(())
    }

    fn quality(&self) -> T::Real {
        let n = self
            .status
            .shape()
            .map_or(0, |(rows, cols)| rows.min(cols));
        triangular_quality(|i| self.decomposer.r_entry(i, i), n)
    }

    fn shape(&self) -> Option<(usize, usize)> {
        self.status.shape()
    }
}
