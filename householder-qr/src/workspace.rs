//! Growth-only scratch storage
//!
//! A [`Workspace`] keeps a column-major buffer whose row stride equals the
//! largest row count reserved so far. Reserving smaller dimensions never
//! releases memory, so repeated decompositions of varying size settle on a
//! single allocation.

use crate::scalar::Scalar;

/// Column-major arena sized by a `(rows, cols)` high-water mark
#[derive(Debug, Clone)]
pub struct Workspace<T> {
    data: Vec<T>,
    max_rows: usize,
    max_cols: usize,
}

impl<T: Scalar> Default for Workspace<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> Workspace<T> {
    /// Empty arena; the first `reserve` allocates
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            max_rows: 0,
            max_cols: 0,
        }
    }

    /// Arena pre-sized for `rows x cols`
    pub fn with_capacity(rows: usize, cols: usize) -> Self {
        let mut ws = Self::new();
        ws.reserve(rows, cols);
        ws
    }

    /// Make room for a `rows x cols` problem.
    ///
    /// Returns `true` when the buffer had to grow. Growth discards the
    /// previous contents because the column stride changes.
    pub fn reserve(&mut self, rows: usize, cols: usize) -> bool {
        if rows <= self.max_rows && cols <= self.max_cols {
            return false;
        }
        let new_rows = rows.max(self.max_rows);
        let new_cols = cols.max(self.max_cols);
        log::debug!(
            target: "householder_qr::workspace",
            "growing workspace from {}x{} to {}x{}",
            self.max_rows,
            self.max_cols,
            new_rows,
            new_cols
        );
        self.max_rows = new_rows;
        self.max_cols = new_cols;
        self.data = vec![T::zero(); new_rows * new_cols];
        true
    }

    /// Current `(rows, cols)` high-water mark
    pub fn capacity(&self) -> (usize, usize) {
        (self.max_rows, self.max_cols)
    }

    /// Column `j`, `capacity().0` elements long
    #[inline]
    pub fn column(&self, j: usize) -> &[T] {
        &self.data[j * self.max_rows..(j + 1) * self.max_rows]
    }

    #[inline]
    pub fn column_mut(&mut self, j: usize) -> &mut [T] {
        &mut self.data[j * self.max_rows..(j + 1) * self.max_rows]
    }

    /// Borrow columns `a` and `b` mutably at the same time, `a < b`
    pub fn column_pair_mut(&mut self, a: usize, b: usize) -> (&mut [T], &mut [T]) {
        debug_assert!(a < b);
        let stride = self.max_rows;
        let (head, tail) = self.data.split_at_mut(b * stride);
        (&mut head[a * stride..(a + 1) * stride], &mut tail[..stride])
    }

    /// Column `a` and every column from `first` up to `last` (exclusive), `a < first`
    pub fn column_and_trailing_mut(
        &mut self,
        a: usize,
        first: usize,
        last: usize,
    ) -> (&[T], &mut [T]) {
        debug_assert!(a < first && first <= last);
        let stride = self.max_rows;
        let (head, tail) = self.data.split_at_mut(first * stride);
        (
            &head[a * stride..(a + 1) * stride],
            &mut tail[..(last - first) * stride],
        )
    }

    /// Exchange two columns in place
    pub fn swap_columns(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let stride = self.max_rows;
        let (head, tail) = self.data.split_at_mut(hi * stride);
        head[lo * stride..(lo + 1) * stride].swap_with_slice(&mut tail[..stride]);
    }

    /// Row stride of the underlying buffer
    #[inline]
    pub fn stride(&self) -> usize {
        self.max_rows
    }
}
