//! # householder-qr: dense Householder QR decompositions
//!
//! Real and complex QR factorizations built from Householder reflectors:
//!
//! - [`HouseholderColumn`]: column-major working copy, optional rayon updates
//! - [`HouseholderTran`]: row-major (transposed) working copy
//! - [`BlockHouseholder`]: panel factorization with compact WY updates
//! - [`HouseholderColPiv`]: rank-revealing factorization with column pivoting
//! - [`QrUpdate`]: Givens-based row insertion and deletion on an existing `Q R`
//!
//! Matrices are [`mdarray::DTensor`]s indexed `[[row, col]]`.

pub mod error;
pub mod parallelism;
pub mod qr;
pub mod scalar;
pub mod strategy;
pub mod svd;
pub mod triangular;
pub mod utils;
pub mod workspace;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::{QrError, Result};
pub use parallelism::Parallelism;
pub use qr::{
    BlockHouseholder, DecompositionState, HouseholderColPiv, HouseholderColumn, HouseholderTran,
    NormUpdate, QrDecomposition, QrUpdate,
};
pub use scalar::{c32, c64, RealScalar, Scalar};
pub use strategy::{select_strategy, MemoryPreference, QrStrategy, SWITCH_BLOCK_QR};
pub use svd::{jacobi_svd, SvdResult};
pub use workspace::Workspace;

pub use mdarray::DTensor;
