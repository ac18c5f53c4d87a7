//! Reference singular value decomposition
//!
//! Used to cross-check the rank-revealing and minimum-norm QR solvers.

pub mod jacobi;

pub use jacobi::{jacobi_svd, JacobiRotation, SvdResult};
