//! Householder QR decompositions
//!
//! All variants share the packed layout described in [`helpers`] and expose
//! it through [`QrDecomposition`].

pub mod block;
pub mod col_pivot;
pub mod column;
pub mod helpers;
pub mod tran;
pub mod update;

pub use block::BlockHouseholder;
pub use col_pivot::{HouseholderColPiv, NormUpdate};
pub use column::HouseholderColumn;
pub use tran::HouseholderTran;
pub use update::QrUpdate;

use crate::error::{QrError, Result};
use crate::scalar::Scalar;
use crate::utils::dense::{identity, set_identity, zeros};
use mdarray::DTensor;

/// Lifecycle of a decomposition instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecompositionState {
    /// Nothing has been decomposed yet
    Uninitialized,
    /// The last `decompose` finished; `success` is false when a column degenerated
    Decomposed { success: bool },
}

/// Common interface of the Householder QR variants
///
/// `decompose` never fails structurally. A zero column is recorded and the
/// call returns `false`, but the factorization is still fully iterated so
/// `q` and `r` remain well defined.
pub trait QrDecomposition<T: Scalar> {
    /// Factor `a` into packed Householder form
    ///
    /// The input is copied into the decomposer's own storage, which only
    /// grows between calls.
    ///
    /// # Arguments
    /// * `a` - Matrix to factor, `rows x cols`
    ///
    /// # Returns
    /// `false` if some Householder step met an all-zero column. The
    /// factorization is still completed and `q`/`r` stay usable.
    fn decompose(&mut self, a: &DTensor<T, 2>) -> bool;

    /// `(rows, cols)` of the last decomposed matrix
    fn shape(&self) -> (usize, usize);

    /// Householder gains, one per reflector
    fn gammas(&self) -> &[T::Real];

    fn state(&self) -> DecompositionState;

    /// Whether `decompose` destroys its argument
    fn input_modified(&self) -> bool {
        false
    }

    /// Multiply the stored reflectors into `q`, which holds an identity of
    /// shape `rows x k` with `k` equal to `min(rows, cols)` or `rows`
    fn accumulate_q(&mut self, q: &mut DTensor<T, 2>);

    /// Entry `(i, j)` of R for `i <= j`
    fn r_entry(&self, i: usize, j: usize) -> T;

    /// Orthogonal factor, `rows x min(rows, cols)` when `compact`, else `rows x rows`
    fn q(&mut self, compact: bool) -> DTensor<T, 2> {
        let (m, n) = self.shape();
        let cols = if compact { m.min(n) } else { m };
        let mut q = identity(m, cols);
        self.accumulate_q(&mut q);
        q
    }

    /// Like [`q`](Self::q) but writes into a caller-provided matrix
    fn q_into(&mut self, q: &mut DTensor<T, 2>, compact: bool) -> Result<()> {
        let (m, n) = self.shape();
        let cols = if compact { m.min(n) } else { m };
        QrError::check_shape("Q", (m, cols), *q.shape())?;
        set_identity(q);
        self.accumulate_q(q);
        Ok(())
    }

    /// Upper triangular factor, `min(rows, cols) x cols` when `compact`, else `rows x cols`
    fn r(&self, compact: bool) -> DTensor<T, 2> {
        let (m, n) = self.shape();
        let rows = if compact { m.min(n) } else { m };
        let mut r = zeros(rows, n);
        fill_r(self, &mut r);
        r
    }

    /// Like [`r`](Self::r) but writes into a caller-provided matrix
    fn r_into(&self, r: &mut DTensor<T, 2>, compact: bool) -> Result<()> {
        let (m, n) = self.shape();
        let rows = if compact { m.min(n) } else { m };
        QrError::check_shape("R", (rows, n), *r.shape())?;
        fill_r(self, r);
        Ok(())
    }
}

impl<T: Scalar, D: QrDecomposition<T> + ?Sized> QrDecomposition<T> for Box<D> {
    fn decompose(&mut self, a: &DTensor<T, 2>) -> bool {
        (**self).decompose(a)
    }

    fn shape(&self) -> (usize, usize) {
        (**self).shape()
    }

    fn gammas(&self) -> &[T::Real] {
        (**self).gammas()
    }

    fn state(&self) -> DecompositionState {
        (**self).state()
    }

    fn input_modified(&self) -> bool {
        (**self).input_modified()
    }

    fn accumulate_q(&mut self, q: &mut DTensor<T, 2>) {
        (**self).accumulate_q(q)
    }

    fn r_entry(&self, i: usize, j: usize) -> T {
        (**self).r_entry(i, j)
    }
}

fn fill_r<T: Scalar, D: QrDecomposition<T> + ?Sized>(d: &D, r: &mut DTensor<T, 2>) {
    let (rows, n) = *r.shape();
    for i in 0..rows {
        for j in 0..n {
            r[[i, j]] = if j >= i { d.r_entry(i, j) } else { T::zero() };
        }
    }
}

/// Temporarily writes the implicit one at the head of a packed reflector.
///
/// The packed value is R's diagonal entry, so it is put back on drop.
pub(crate) struct UnitHead<'a, T: Scalar> {
    column: &'a mut [T],
    index: usize,
    saved: T,
}

impl<'a, T: Scalar> UnitHead<'a, T> {
    pub(crate) fn new(column: &'a mut [T], index: usize) -> Self {
        let saved = column[index];
        column[index] = T::one();
        Self {
            column,
            index,
            saved,
        }
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[T] {
        self.column
    }
}

impl<T: Scalar> Drop for UnitHead<'_, T> {
    fn drop(&mut self) {
        self.column[self.index] = self.saved;
    }
}
