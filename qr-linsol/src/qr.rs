//! Solver over any [`QrDecomposition`] using explicit Q and R

use crate::error::Result;
use crate::solver::{prepare_solution, require_tall, triangular_quality, LinearSolver, SystemStatus};
use householder_qr::triangular::solve_upper;
use householder_qr::utils::zeros;
use householder_qr::{QrDecomposition, Scalar};
use mdarray::DTensor;

/// Least-squares solver that materializes the compact factors once per `set_a`
///
/// Works with any decomposition, including boxed ones picked at run time.
#[derive(Debug, Clone)]
pub struct QrSolver<T: Scalar, D: QrDecomposition<T>> {
    decomposer: D,
    q: DTensor<T, 2>,
    r: DTensor<T, 2>,
    y: Vec<T>,
    status: SystemStatus,
}

impl<T: Scalar, D: QrDecomposition<T>> QrSolver<T, D> {
    pub fn new(decomposer: D) -> Self {
        Self {
            decomposer,
            q: zeros(0, 0),
            r: zeros(0, 0),
            y: Vec::new(),
            status: SystemStatus::Empty,
        }
    }

    pub fn decomposer(&self) -> &D {
        &self.decomposer
    }

    /// Compact Q of the current system (`rows x cols`)
    pub fn q(&self) -> &DTensor<T, 2> {
        &self.q
    }

    /// Compact R of the current system (`cols x cols`)
    pub fn r(&self) -> &DTensor<T, 2> {
        &self.r
    }
}

impl<T: Scalar, D: QrDecomposition<T>> LinearSolver<T> for QrSolver<T, D> {
    fn set_a(&mut self, a: &DTensor<T, 2>) -> Result<bool> {
        let (rows, cols) = require_tall(a)?;
        let success = self.decomposer.decompose(a);
        self.q = self.decomposer.q(true);
        self.r = self.decomposer.r(true);
        self.status = SystemStatus::after_decompose(rows, cols, success);
        Ok(success)
    }

    fn solve(&mut self, b: &DTensor<T, 2>, x: &mut DTensor<T, 2>) -> Result<()> {
        let (rows, cols) = self.status.ready()?;
        let k = prepare_solution(b, rows, cols, x)?;
        self.y.resize(cols, T::zero());
        for c in 0..k {
            // y = Q^H b
            for (j, yj) in self.y.iter_mut().enumerate() {
                let mut sum = T::zero();
                for i in 0..rows {
                    sum += self.q[[i, j]].conjugate() * b[[i, c]];
                }
                *yj = sum;
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

    fn modifies_a(&self) -> bool {
        self.decomposer.input_modified()
    }
}
