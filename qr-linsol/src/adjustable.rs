//! Least-squares solver whose system can gain and lose rows

use crate::error::Result;
use crate::solver::{prepare_solution, require_tall, triangular_quality, LinearSolver, SystemStatus};
use householder_qr::triangular::solve_upper;
use householder_qr::utils::{matmul, zeros};
use householder_qr::{HouseholderColumn, QrDecomposition, QrUpdate, RealScalar};
use mdarray::DTensor;

/// QR solver that keeps the full `Q` and `R` so rows can be added and
/// removed through [`QrUpdate`] instead of refactoring.
///
/// Row capacity grows by a tenth of the current capacity (at least one row)
/// whenever an insertion overflows it.
#[derive(Debug, Clone)]
pub struct AdjustableQrSolver<T: RealScalar> {
    decomposer: HouseholderColumn<T>,
    update: QrUpdate<T>,
    q: DTensor<T, 2>,
    r: DTensor<T, 2>,
    max_rows: usize,
    max_cols: usize,
    y: Vec<T>,
    status: SystemStatus,
}

impl<T: RealScalar> Default for AdjustableQrSolver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RealScalar> AdjustableQrSolver<T> {
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    /// Solver with buffers sized for `max_rows x max_cols` systems
    pub fn with_capacity(max_rows: usize, max_cols: usize) -> Self {
        let mut solver = Self {
            decomposer: HouseholderColumn::new(),
            update: QrUpdate::with_capacity(0, 0),
            q: zeros(0, 0),
            r: zeros(0, 0),
            max_rows: 0,
            max_cols: 0,
            y: Vec::new(),
            status: SystemStatus::Empty,
        };
        solver.set_max_size(max_rows, max_cols);
        solver
    }

    /// `(rows, cols)` the buffers currently hold
    pub fn capacity(&self) -> (usize, usize) {
        (self.max_rows, self.max_cols)
    }

    fn set_max_size(&mut self, max_rows: usize, max_cols: usize) {
        self.max_rows = self.max_rows.max(max_rows);
        self.max_cols = self.max_cols.max(max_cols);
        self.decomposer
            .set_expected_max_size(self.max_rows, self.max_cols);
        self.update
            .declare_internal_data(self.max_rows, self.max_cols);
    }

    fn grow_for(&mut self, rows: usize, cols: usize) {
        if rows > self.max_rows || cols > self.max_cols {
            let grow = (self.max_rows / 10).max(1);
            let new_rows = if rows > self.max_rows { rows + grow - 1 } else { self.max_rows };
            log::debug!(
                target: "qr_linsol::adjustable",
                "growing row capacity from {} to {}",
                self.max_rows,
                new_rows
            );
            self.set_max_size(new_rows, cols);
        }
    }

    /// Insert `row` into `A` at `row_index` and update the factors in place
    pub fn add_row_to_a(&mut self, row: &[T], row_index: usize) -> Result<()> {
        let (rows, cols) = self.status.ready()?;
        self.grow_for(rows + 1, cols);
        self.update
            .add_row(&mut self.q, &mut self.r, row, row_index)?;
        self.status = SystemStatus::Ready {
            rows: rows + 1,
            cols,
        };
        Ok(())
    }

    /// Remove row `row_index` from `A` and update the factors in place
    pub fn remove_row_from_a(&mut self, row_index: usize) -> Result<()> {
        let (rows, cols) = self.status.ready()?;
        self.update.delete_row(&mut self.q, &mut self.r, row_index)?;
        self.status = SystemStatus::Ready {
            rows: rows - 1,
            cols,
        };
        Ok(())
    }

    /// The current system, reconstructed as `Q R`
    pub fn a(&self) -> Result<DTensor<T, 2>> {
        self.status.ready()?;
        Ok(matmul(&self.q, &self.r))
    }

    /// Full orthogonal factor, `rows x rows`
    pub fn q(&self) -> &DTensor<T, 2> {
        &self.q
    }

    /// Full triangular factor, `rows x cols`
    pub fn r(&self) -> &DTensor<T, 2> {
        &self.r
    }
}

impl<T: RealScalar> LinearSolver<T> for AdjustableQrSolver<T> {
    fn set_a(&mut self, a: &DTensor<T, 2>) -> Result<bool> {
        let (rows, cols) = require_tall(a)?;
        if rows > self.max_rows || cols > self.max_cols {
            self.set_max_size(rows, cols);
        }
        let success = self.decomposer.decompose(a);
        self.q = self.decomposer.q(false);
        self.r = self.decomposer.r(false);
        self.status = SystemStatus::after_decompose(rows, cols, success);
        Ok(success)
    }

    fn solve(&mut self, b: &DTensor<T, 2>, x: &mut DTensor<T, 2>) -> Result<()> {
        let (rows, cols) = self.status.ready()?;
        let k = prepare_solution(b, rows, cols, x)?;
        self.y.resize(cols, T::zero());
        for c in 0..k {
            for (j, yj) in self.y.iter_mut().enumerate() {
                *yj = (0..rows).fold(T::zero(), |acc, i| acc + self.q[[i, j]] * b[[i, c]]);
            }
            solve_upper(&self.r, &mut self.y, cols);
            for (j, &v) in self.y.iter().enumerate() {
                x[[j, c]] = v;
            }
        }
        Ok(())
    }

    fn quality(&self) -> T::Real {
        let n = self.status.shape().map_or(0, |(_, cols)| cols);
        triangular_quality(|i| self.r[[i, i]], n)
    }

    fn shape(&self) -> Option<(usize, usize)> {
        self.status.shape()
    }
}
