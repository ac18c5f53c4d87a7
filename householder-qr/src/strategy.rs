//! Choosing a QR layout from the problem shape

use crate::qr::{
    block::DEFAULT_BLOCK_LENGTH, BlockHouseholder, HouseholderColumn, HouseholderTran,
    QrDecomposition,
};
use crate::scalar::Scalar;

/// Column count from which the blocked factorization pays off
pub const SWITCH_BLOCK_QR: usize = 1500;

/// Whether to trade memory for speed when picking an algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemoryPreference {
    #[default]
    Speed,
    Memory,
}

/// Householder QR layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QrStrategy {
    /// Column-major copy; tall and medium matrices
    HouseholderColumn,
    /// Transposed copy; wide matrices
    HouseholderTran,
    /// Panels of `block_length` columns with compact WY updates
    Block { block_length: usize },
}

/// Pick a layout for a `rows x cols` problem
pub fn select_strategy(rows: usize, cols: usize, preference: MemoryPreference) -> QrStrategy {
    let unblocked = if rows < cols {
        QrStrategy::HouseholderTran
    } else {
        QrStrategy::HouseholderColumn
    };
    if cols < SWITCH_BLOCK_QR {
        return unblocked;
    }
    match preference {
        MemoryPreference::Speed => QrStrategy::Block {
            block_length: DEFAULT_BLOCK_LENGTH,
        },
        MemoryPreference::Memory => unblocked,
    }
}

impl QrStrategy {
    /// Instantiate the decomposition this strategy names
    pub fn build<T: Scalar>(self) -> Box<dyn QrDecomposition<T> + Send> {
        match self {
            QrStrategy::HouseholderColumn => Box::new(HouseholderColumn::new()),
            QrStrategy::HouseholderTran => Box::new(HouseholderTran::new()),
            QrStrategy::Block { block_length } => Box::new(BlockHouseholder::new(block_length)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::dense::from_rows;

    #[test]
    fn test_select_strategy() {
        assert_eq!(
            select_strategy(100, 10, MemoryPreference::Speed),
            QrStrategy::HouseholderColumn
        );
        assert_eq!(
            select_strategy(10, 100, MemoryPreference::Speed),
            QrStrategy::HouseholderTran
        );
        assert_eq!(
            select_strategy(3000, 2000, MemoryPreference::Speed),
            QrStrategy::Block { block_length: 60 }
        );
        assert_eq!(
            select_strategy(3000, 2000, MemoryPreference::Memory),
            QrStrategy::HouseholderColumn
        );
        assert_eq!(
            select_strategy(100, SWITCH_BLOCK_QR - 1, MemoryPreference::Speed),
            QrStrategy::HouseholderTran
        );
    }

    #[test]
    fn test_build_decomposes() {
        let a = from_rows::<f64, _>(&[[5.0, 2.0, 3.0], [1.5, -2.0, 8.0], [-3.0, 4.7, -0.5]]);
        for strategy in [
            QrStrategy::HouseholderColumn,
            QrStrategy::HouseholderTran,
            QrStrategy::Block { block_length: 2 },
        ] {
            let mut decomp = strategy.build::<f64>();
            assert!(decomp.decompose(&a));
            assert_eq!(decomp.shape(), (3, 3));
        }
    }
}
