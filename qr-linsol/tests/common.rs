//! Common test utilities

#![allow(dead_code)]

use householder_qr::utils::tabulate;
use householder_qr::{c64, Scalar};
use mdarray::DTensor;
use num_complex::Complex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Types drawn uniformly from `[-1, 1)` per component
pub trait RandomGenerate: Scalar {
    fn generate(rng: &mut StdRng) -> Self;
}

impl RandomGenerate for f64 {
    fn generate(rng: &mut StdRng) -> Self {
        rng.random_range(-1.0..1.0)
    }
}

impl RandomGenerate for f32 {
    fn generate(rng: &mut StdRng) -> Self {
        rng.random_range(-1.0f32..1.0)
    }
}

impl RandomGenerate for c64 {
    fn generate(rng: &mut StdRng) -> Self {
        Complex::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0))
    }
}

/// Seeded random `rows x cols` matrix
pub fn random_matrix<T: RandomGenerate>(rows: usize, cols: usize, seed: u64) -> DTensor<T, 2> {
    let mut rng = StdRng::seed_from_u64(seed);
    let values: Vec<T> = (0..rows * cols).map(|_| T::generate(&mut rng)).collect();
    tabulate(rows, cols, |i, j| values[i * cols + j])
}

/// Random matrix of exact rank `rank`, built as a product of two random factors
pub fn random_low_rank(rows: usize, cols: usize, rank: usize, seed: u64) -> DTensor<f64, 2> {
    let left = random_matrix::<f64>(rows, rank, seed);
    let right = random_matrix::<f64>(rank, cols, seed + 1);
    householder_qr::utils::matmul(&left, &right)
}

/// Largest entry-wise distance between two matrices of the same shape
pub fn max_abs_diff<T: Scalar>(a: &DTensor<T, 2>, b: &DTensor<T, 2>) -> f64
where
    T::Real: Into<f64>,
{
    assert_eq!(a.shape(), b.shape(), "shape mismatch");
    let (m, n) = *a.shape();
    let mut max = 0.0;
    for i in 0..m {
        for j in 0..n {
            let d: f64 = (a[[i, j]] - b[[i, j]]).magnitude().into();
            if d > max {
                max = d;
            }
        }
    }
    max
}

/// Column vector as an `n x 1` matrix
pub fn column<T: Scalar>(values: &[T]) -> DTensor<T, 2> {
    tabulate(values.len(), 1, |i, _| values[i])
}

/// Euclidean norm of column `c`
pub fn column_norm(x: &DTensor<f64, 2>, c: usize) -> f64 {
    let rows = x.shape().0;
    (0..rows).map(|i| x[[i, c]] * x[[i, c]]).sum::<f64>().sqrt()
}
