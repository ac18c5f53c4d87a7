//! Solver error types

use householder_qr::QrError;

/// Structural errors raised by the linear solvers
///
/// A degenerate matrix is not an error: `set_a` reports it as `Ok(false)`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SolverError {
    #[error(transparent)]
    Qr(#[from] QrError),

    #[error("solve called before set_a")]
    NoSystem,

    #[error("the last decomposition degenerated; call set_a with a new system")]
    DecompositionFailed,

    #[error("solver needs at least as many rows as columns, found {rows}x{cols}")]
    WideSystem { rows: usize, cols: usize },

    #[error("requested {requested} null space vectors but the matrix has {available} columns")]
    NullSpaceSize { requested: usize, available: usize },
}

pub type Result<T> = std::result::Result<T, SolverError>;
