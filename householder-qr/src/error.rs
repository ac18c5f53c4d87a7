//! Error types for structural misuse of the decompositions
//!
//! Numerical degeneracy is never an error here: a zero column is reported
//! through the `bool` returned by `decompose` and through the detected rank.

/// Structural errors raised by decompositions and updates
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QrError {
    #[error("{context}: expected {expected:?}, found {found:?}")]
    DimensionMismatch {
        context: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("matrix must be square, found {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("removing a row would leave an under determined system ({rows}x{cols})")]
    UnderDetermined { rows: usize, cols: usize },

    #[error("requested {requested:?} exceeds fixed capacity {capacity:?}")]
    CapacityExceeded {
        requested: (usize, usize),
        capacity: (usize, usize),
    },

    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, QrError>;

impl QrError {
    /// Shape check helper used by every `*_into` accessor
    pub(crate) fn check_shape(
        context: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    ) -> Result<()> {
        if expected == found {
            Ok(())
        } else {
            Err(QrError::DimensionMismatch {
                context,
                expected,
                found,
            })
        }
    }
}
