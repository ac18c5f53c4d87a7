//! Common test utilities

use crate::scalar::{c32, c64, Scalar};
use mdarray::DTensor;
use num_complex::Complex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Types that can be drawn uniformly from `[-1, 1)` (per component)
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

impl RandomGenerate for c32 {
    fn generate(rng: &mut StdRng) -> Self {
        Complex::new(
            rng.random_range(-1.0f32..1.0),
            rng.random_range(-1.0f32..1.0),
        )
    }
}

/// Seeded random `rows x cols` matrix
pub fn random_matrix<T: RandomGenerate>(rows: usize, cols: usize, seed: u64) -> DTensor<T, 2> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut values = Vec::with_capacity(rows * cols);
    for _ in 0..rows * cols {
        values.push(T::generate(&mut rng));
    }
    crate::utils::dense::tabulate(rows, cols, |i, j| values[i * cols + j])
}

/// Largest entry-wise distance between two matrices of the same shape
pub fn max_abs_diff<T: Scalar>(a: &DTensor<T, 2>, b: &DTensor<T, 2>) -> T::Real {
    assert_eq!(a.shape(), b.shape(), "shape mismatch");
    let (m, n) = *a.shape();
    let mut max = <T::Real as num_traits::Zero>::zero();
    for i in 0..m {
        for j in 0..n {
            let d = (a[[i, j]] - b[[i, j]]).magnitude();
            if d > max {
                max = d;
            }
        }
    }
    max
}
