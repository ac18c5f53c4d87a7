//! Solver over the transposed packed factor

use crate::error::Result;
use crate::solver::{prepare_solution, require_tall, triangular_quality, LinearSolver, SystemStatus};
use householder_qr::triangular::solve_upper_with;
use householder_qr::{HouseholderTran, QrDecomposition, Scalar};
use mdarray::DTensor;

/// Least squares through [`HouseholderTran`]; `Q^H` is applied to all of
/// `B` at once
#[derive(Debug, Clone)]
pub struct QrHouseTranSolver<T: Scalar> {
    decomposer: HouseholderTran<T>,
    status: SystemStatus,
    y: Vec<T>,
}

impl<T: Scalar> Default for QrHouseTranSolver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> QrHouseTranSolver<T> {
    pub fn new() -> Self {
        Self {
            decomposer: HouseholderTran::new(),
            status: SystemStatus::Empty,
            y: Vec::new(),
        }
    }

    pub fn decomposer(&self) -> &HouseholderTran<T> {
        &self.decomposer
    }
}

impl<T: Scalar> LinearSolver<T> for QrHouseTranSolver<T> {
    fn set_a(&mut self, a: &DTensor<T, 2>) -> Result<bool> {
        let (rows, cols) = require_tall(a)?;
        let success = self.decomposer.decompose(a);
        self.status = SystemStatus::after_decompose(rows, cols, success);
        Ok(success)
    }

    fn solve(&mut self, b: &DTensor<T, 2>, x: &mut DTensor<T, 2>) -> Result<()> {
        let (rows, cols) = self.status.ready()?;
        let k = prepare_solution(b, rows, cols, x)?;

        let mut work = b.clone();
        self.decomposer.apply_q_tran(&mut work)?;

        let decomposer = &self.decomposer;
        self.y.resize(cols, T::zero());
        for c in 0..k {
            for (j, yj) in self.y.iter_mut().enumerate() {
                *yj = work[[j, c]];
            }
            solve_upper_with(|i, j| decomposer.r_entry(i, j), &mut self.y, cols);
            for (j, &v) in self.y.iter().enumerate() {
                x[[j, c]] = v;
            }
        }
        Ok(())
    }

    fn quality(&self) -> T::Real {
        let n = self.status.shape().map_or(0, |(_, cols)| cols);
        triangular_quality(|i| self.decomposer.r_entry(i, i), n)
    }

    fn shape(&self) -> Option<(usize, usize)> {
        self.status.shape()
    }
}
