//! Solver working directly on the packed column-major reflectors

use crate::error::Result;
use crate::solver::{
    column_of, prepare_solution, require_tall, triangular_quality, LinearSolver, SystemStatus,
};
use householder_qr::triangular::solve_upper_packed;
use householder_qr::{HouseholderColumn, Parallelism, QrDecomposition, Scalar};
use mdarray::DTensor;
use rayon::prelude::*;

/// Least squares through [`HouseholderColumn`] without forming Q.
///
/// With [`Parallelism::Rayon`] the decomposition updates trailing columns on
/// the rayon pool and `solve` distributes right-hand sides across it, each
/// job with its own scratch vector.
#[derive(Debug, Clone)]
pub struct QrHouseColSolver<T: Scalar> {
    decomposer: HouseholderColumn<T>,
    status: SystemStatus,
}

impl<T: Scalar> Default for QrHouseColSolver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> QrHouseColSolver<T> {
    pub fn new() -> Self {
        Self {
            decomposer: HouseholderColumn::new(),
            status: SystemStatus::Empty,
        }
    }

    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.decomposer = self.decomposer.with_parallelism(parallelism);
        self
    }

    pub fn parallelism(&self) -> Parallelism {
        self.decomposer.parallelism()
    }

    pub fn decomposer(&self) -> &HouseholderColumn<T> {
        &self.decomposer
    }

    fn solve_column(&self, b: &DTensor<T, 2>, c: usize, cols: usize) -> Vec<T> {
        let mut v = column_of(b, c);
        self.decomposer.apply_q_tran_to(&mut v);
        solve_upper_packed(|j| self.decomposer.reflector(j), &mut v, cols);
        v.truncate(cols);
        v
    }
}

impl<T: Scalar> LinearSolver<T> for QrHouseColSolver<T> {
    fn set_a(&mut self, a: &DTensor<T, 2>) -> Result<bool> {
        let (rows, cols) = require_tall(a)?;
        let success = self.decomposer.decompose(a);
        self.status = SystemStatus::after_decompose(rows, cols, success);
        Ok(success)
    }

    fn solve(&mut self, b: &DTensor<T, 2>, x: &mut DTensor<T, 2>) -> Result<()> {
        let (rows, cols) = self.status.ready()?;
        let k = prepare_solution(b, rows, cols, x)?;

        let solutions: Vec<Vec<T>> = if self.parallelism().should_split(rows * cols * k) {
            (0..k)
                .into_par_iter()
                .map(|c| self.solve_column(b, c, cols))
                .collect()
        } else {
            (0..k).map(|c| self.solve_column(b, c, cols)).collect()
        };

        for (c, solution) in solutions.iter().enumerate() {
            for (j, &v) in solution.iter().enumerate() {
                x[[j, c]] = v;
            }
        }
        Ok(())
    }

    fn quality(&self) -> T::Real {
        let n = self.status.shape().map_or(0, |(_, cols)| cols);
        triangular_quality(|i| self.decomposer.reflector(i)[i], n)
    }

    fn shape(&self) -> Option<(usize, usize)> {
        self.status.shape()
    }
}
