//! The solver interface and the bookkeeping shared by its implementations

use crate::error::{Result, SolverError};
use householder_qr::utils::{identity, zeros};
use householder_qr::{QrError, Scalar};
use mdarray::DTensor;
use num_traits::{Float, Zero};

/// Solves `A X = B` (least squares when `A` is tall) for a fixed `A`
pub trait LinearSolver<T: Scalar> {
    /// Decompose `a`. `Ok(false)` means the matrix degenerated and the
    /// solver cannot be used until the next successful call.
    fn set_a(&mut self, a: &DTensor<T, 2>) -> Result<bool>;

    /// Solve for every column of `b`. `x` is reshaped to `cols x b.cols`
    /// when its shape differs.
    fn solve(&mut self, b: &DTensor<T, 2>, x: &mut DTensor<T, 2>) -> Result<()>;

    /// Cheap singularity sensor: `min |r_ii| / max |r_ii|`, zero when singular
    fn quality(&self) -> T::Real;

    /// `(rows, cols)` of the current system, if one is set
    fn shape(&self) -> Option<(usize, usize)>;

    fn modifies_a(&self) -> bool {
        false
    }

    fn modifies_b(&self) -> bool {
        false
    }

    /// Inverse (or least-squares pseudo-inverse) of `A`, `cols x rows`
    fn invert(&mut self, a_inv: &mut DTensor<T, 2>) -> Result<()> {
        let (rows, _) = self.shape().ok_or(SolverError::NoSystem)?;
        let eye = identity(rows, rows);
        self.solve(&eye, a_inv)
    }
}

/// Where a solver is in its `set_a` / `solve` cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum SystemStatus {
    #[default]
    Empty,
    Ready { rows: usize, cols: usize },
    Failed { rows: usize, cols: usize },
}

impl SystemStatus {
    pub(crate) fn after_decompose(rows: usize, cols: usize, success: bool) -> Self {
        if success {
            SystemStatus::Ready { rows, cols }
        } else {
            SystemStatus::Failed { rows, cols }
        }
    }

    pub(crate) fn shape(self) -> Option<(usize, usize)> {
        match self {
            SystemStatus::Empty => None,
            SystemStatus::Ready { rows, cols } | SystemStatus::Failed { rows, cols } => {
                Some((rows, cols))
            }
        }
    }

    /// Shape of a usable system
    pub(crate) fn ready(self) -> Result<(usize, usize)> {
        match self {
            SystemStatus::Ready { rows, cols } => Ok((rows, cols)),
            SystemStatus::Empty => Err(SolverError::NoSystem),
            SystemStatus::Failed { .. } => {
                log::warn!(target: "qr_linsol::solver", "solve after a degenerate set_a");
                Err(SolverError::DecompositionFailed)
            }
        }
    }
}

/// Reject wide systems for solvers that only handle `rows >= cols`
pub(crate) fn require_tall<T: Scalar>(a: &DTensor<T, 2>) -> Result<(usize, usize)> {
    let (rows, cols) = *a.shape();
    if rows < cols {
        return Err(SolverError::WideSystem { rows, cols });
    }
    Ok((rows, cols))
}

/// Validate `b` against a `rows x cols` system and shape `x` for the answer.
/// Returns the number of right-hand sides.
pub(crate) fn prepare_solution<T: Scalar>(
    b: &DTensor<T, 2>,
    rows: usize,
    cols: usize,
    x: &mut DTensor<T, 2>,
) -> Result<usize> {
    let (b_rows, k) = *b.shape();
    if b_rows != rows {
        return Err(QrError::DimensionMismatch {
            context: "B",
            expected: (rows, k),
            found: (b_rows, k),
        }
        .into());
    }
    if *x.shape() != (cols, k) {
        *x = zeros(cols, k);
    }
    Ok(k)
}

/// Column `c` of `b` as a vector
pub(crate) fn column_of<T: Scalar>(b: &DTensor<T, 2>, c: usize) -> Vec<T> {
    let rows = b.shape().0;
    (0..rows).map(|i| b[[i, c]]).collect()
}

/// `min |d_i| / max |d_i|` over `diag(0..n)`; zero for an empty or singular diagonal
pub fn triangular_quality<T, F>(diag: F, n: usize) -> T::Real
where
    T: Scalar,
    F: Fn(usize) -> T,
{
    if n == 0 {
        return T::Real::zero();
    }
    let (min, max) = (0..n).map(|i| diag(i).magnitude()).fold(
        (T::Real::infinity(), T::Real::zero()),
        |(lo, hi), v| (lo.min(v), hi.max(v)),
    );
    if max == T::Real::zero() {
        T::Real::zero()
    } else {
        min / max
    }
}
