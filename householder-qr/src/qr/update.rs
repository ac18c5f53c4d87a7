//! Incremental QR maintenance under row insertion and deletion
//!
//! Given `A = Q R` with a square `Q`, inserting or removing a row of `A` is
//! absorbed by a sequence of Givens rotations collected in an orthogonal
//! matrix `U`. The new factors are `Q' = P [1 0; 0 Q] U^T`, `R' = U [x; R]`
//! for an insertion and the trailing blocks of `Q U^T` and `U R` for a
//! deletion. Both cost O(m^2 + m n) instead of a full refactorization.

use crate::error::{QrError, Result};
use crate::scalar::RealScalar;
use crate::utils::dense::{tabulate, zeros};
use crate::workspace::Workspace;
use mdarray::DTensor;

/// Reusable state for Givens based row updates of a real QR pair
#[derive(Debug, Clone)]
pub struct QrUpdate<T: RealScalar> {
    /// Row `i` of `U` is column `i` of the workspace
    u_tran: Workspace<T>,
    /// Residual of the inserted row while it is rotated into R
    r_row: Vec<T>,
    max_cols: usize,
    /// Order of the last `U`
    last_order: usize,
    auto_grow: bool,
}

impl<T: RealScalar> Default for QrUpdate<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RealScalar> QrUpdate<T> {
    /// Update state that grows its buffers on demand
    pub fn new() -> Self {
        Self {
            u_tran: Workspace::new(),
            r_row: Vec::new(),
            max_cols: 0,
            last_order: 0,
            auto_grow: true,
        }
    }

    /// Update state with a fixed capacity; larger requests are rejected
    pub fn with_capacity(max_rows: usize, max_cols: usize) -> Self {
        let mut update = Self::new();
        update.auto_grow = false;
        update.declare_internal_data(max_rows, max_cols);
        update
    }

    /// Reserve room for systems up to `max_rows x max_cols`; never shrinks
    pub fn declare_internal_data(&mut self, max_rows: usize, max_cols: usize) {
        self.u_tran.reserve(max_rows, max_rows);
        if max_cols > self.max_cols {
            self.max_cols = max_cols;
            self.r_row.resize(max_cols, T::zero());
        }
    }

    /// `(rows, cols)` currently reserved
    pub fn capacity(&self) -> (usize, usize) {
        (self.u_tran.capacity().0, self.max_cols)
    }

    /// `U` from the last update, as a dense matrix
    pub fn u_tran(&self) -> DTensor<T, 2> {
        let m = self.last_order;
        tabulate(m, m, |i, j| self.u_tran.column(i)[j])
    }

    fn ensure_capacity(&mut self, rows: usize, cols: usize) -> Result<()> {
        let capacity = self.capacity();
        if rows <= capacity.0 && cols <= capacity.1 {
            return Ok(());
        }
        if !self.auto_grow {
            return Err(QrError::CapacityExceeded {
                requested: (rows, cols),
                capacity,
            });
        }
        self.declare_internal_data(rows.max(capacity.0), cols.max(capacity.1));
        Ok(())
    }

    fn reset_u(&mut self, order: usize) {
        self.last_order = order;
        for i in 0..order {
            let row = self.u_tran.column_mut(i);
            for (j, v) in row.iter_mut().take(order).enumerate() {
                *v = if i == j { T::one() } else { T::zero() };
            }
        }
    }

    /// Rotate rows `k` and `k + 1` of `U`, touching columns `cols`
    fn rotate_u(&mut self, k: usize, cols: std::ops::Range<usize>, c: T, s: T, flip: bool) {
        let (upper, lower) = self.u_tran.column_pair_mut(k, k + 1);
        for col in cols {
            let q1 = upper[col];
            let q2 = lower[col];
            if flip {
                upper[col] = c * q2 + s * q1;
                lower[col] = c * q1 - s * q2;
            } else {
                upper[col] = c * q1 + s * q2;
                lower[col] = c * q2 - s * q1;
            }
        }
    }

    /// Insert `row` into `A` at `row_index`, replacing `q` and `r` with the
    /// factors of the enlarged matrix
    ///
    /// # Arguments
    /// * `q` - Full `m x m` orthogonal factor, replaced by `(m+1) x (m+1)`
    /// * `r` - `m x n` upper triangular factor, replaced by `(m+1) x n`
    /// * `row` - The new row, of length `n`
    /// * `row_index` - Position of the new row, `0..=m`
    ///
    /// # Returns
    /// An error if the shapes disagree or `row_index` is out of range; the
    /// factors are untouched in that case.
    pub fn add_row(
        &mut self,
        q: &mut DTensor<T, 2>,
        r: &mut DTensor<T, 2>,
        row: &[T],
        row_index: usize,
    ) -> Result<()> {
        let (m, n) = check_pair(q, r)?;
        if row.len() != n {
            return Err(QrError::DimensionMismatch {
                context: "inserted row",
                expected: (1, n),
                found: (1, row.len()),
            });
        }
        if row_index > m {
            return Err(QrError::IndexOutOfBounds {
                index: row_index,
                len: m + 1,
            });
        }

        let m_m = m + 1;
        self.ensure_capacity(m_m, n)?;
        self.reset_u(m_m);

        let mut r_new = zeros(m_m, n);
        for i in 0..m {
            for j in 0..n {
                r_new[[i, j]] = r[[i, j]];
            }
        }
        self.r_row[..n].copy_from_slice(row);

        // Before rotation k the residual sits in row k of U [x; R] and R_k in row k + 1.
        let t = n.min(m);
        for k in 0..t {
            let xi = r_new[[k, k]];
            let xj = self.r_row[k];
            let (c, s, rad) = givens(xi, xj);
            r_new[[k, k]] = rad;
            self.r_row[k] = T::zero();
            for col in (k + 1)..n {
                let vali = r_new[[k, col]];
                let valj = self.r_row[col];
                r_new[[k, col]] = c * vali + s * valj;
                self.r_row[col] = c * valj - s * vali;
            }
            self.rotate_u(k, 0..k + 2, c, s, true);
        }
        if m < n {
            for col in 0..n {
                r_new[[m, col]] = if col >= m { self.r_row[col] } else { T::zero() };
            }
        }

        let mut q_new = zeros(m_m, m_m);
        for j in 0..m_m {
            let u_row = &self.u_tran.column(j)[..m_m];
            q_new[[row_index, j]] = u_row[0];
            for i in 0..m {
                let dst = if i < row_index { i } else { i + 1 };
                let mut sum = T::zero();
                for k in 0..m {
                    sum = sum + q[[i, k]] * u_row[k + 1];
                }
                q_new[[dst, j]] = sum;
            }
        }

        *q = q_new;
        *r = r_new;
        Ok(())
    }

    /// Remove row `row_index` from `A`, replacing `q` and `r` with the
    /// factors of the reduced matrix. The reduced system must keep at least
    /// as many rows as columns.
    ///
    /// # Arguments
    /// * `q` - Full `m x m` orthogonal factor, replaced by `(m-1) x (m-1)`
    /// * `r` - `m x n` upper triangular factor, replaced by `(m-1) x n`
    /// * `row_index` - Row of `A` to drop, `0..m`
    pub fn delete_row(
        &mut self,
        q: &mut DTensor<T, 2>,
        r: &mut DTensor<T, 2>,
        row_index: usize,
    ) -> Result<()> {
        let (m, n) = check_pair(q, r)?;
        if row_index >= m {
            return Err(QrError::IndexOutOfBounds {
                index: row_index,
                len: m,
            });
        }
        if m - 1 < n {
            return Err(QrError::UnderDetermined { rows: m, cols: n });
        }

        self.ensure_capacity(m, n)?;
        self.reset_u(m);

        // Rotate the selected row of Q onto e_0, starting from the bottom
        let mut xj = q[[row_index, m - 1]];
        for j in (0..m - 1).rev() {
            let xi = q[[row_index, j]];
            let (c, s, rad) = givens(xi, xj);
            xj = rad;
            self.rotate_u(j, j..m, c, s, false);
        }

        let mut q_new = zeros(m - 1, m - 1);
        let mut dst = 0;
        for i in 0..m {
            if i == row_index {
                continue;
            }
            for j in 1..m {
                let u_row = &self.u_tran.column(j)[..m];
                let mut sum = T::zero();
                for k in 0..m {
                    sum = sum + q[[i, k]] * u_row[k];
                }
                q_new[[dst, j - 1]] = sum;
            }
            dst += 1;
        }

        let mut r_new = zeros(m - 1, n);
        for i in 1..=n {
            let u_row = &self.u_tran.column(i)[..m];
            for j in 0..n {
                let mut sum = T::zero();
                for k in (i - 1)..=j.min(m - 1) {
                    sum = sum + u_row[k] * r[[k, j]];
                }
                r_new[[i - 1, j]] = sum;
            }
        }

        *q = q_new;
        *r = r_new;
        Ok(())
    }
}

/// Rotation `(c, s, r)` with `c xi + s xj = r` and `c xj - s xi = 0`
fn givens<T: RealScalar>(xi: T, xj: T) -> (T, T, T) {
    let r = xi.hypot(xj);
    if r == T::zero() {
        (T::one(), T::zero(), T::zero())
    } else {
        (xi / r, xj / r, r)
    }
}

fn check_pair<T: RealScalar>(q: &DTensor<T, 2>, r: &DTensor<T, 2>) -> Result<(usize, usize)> {
    let (m, m2) = *q.shape();
    if m != m2 {
        return Err(QrError::NotSquare { rows: m, cols: m2 });
    }
    let (rows, n) = *r.shape();
    QrError::check_shape("R", (m, n), (rows, n))?;
    Ok((m, n))
}

#[cfg(test)]
#[path = "update_tests.rs"]
mod tests;
