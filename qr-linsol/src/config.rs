//! Solver configuration and the factory that turns it into a solver

use crate::house_col::QrHouseColSolver;
use crate::house_tran::QrHouseTranSolver;
use crate::qr::QrSolver;
use crate::qrp::{QrpConfig, QrpSolver};
use crate::solver::LinearSolver;
use householder_qr::{select_strategy, MemoryPreference, Parallelism, QrStrategy, Scalar};

/// Which solver [`linear_solver`] builds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    pub strategy: QrStrategy,
    pub parallelism: Parallelism,
    /// Use column pivoting; required for rank-deficient or wide systems
    pub pivoting: Option<QrpConfig>,
}

impl SolverConfig {
    /// Defaults for a `rows x cols` system. Wide systems get the
    /// minimum-norm pivoted solver.
    pub fn for_shape(rows: usize, cols: usize) -> Self {
        Self {
            strategy: select_strategy(rows, cols, MemoryPreference::default()),
            parallelism: Parallelism::None,
            pivoting: (rows < cols).then(QrpConfig::default),
        }
    }

    /// Pseudo-inverse style solver that tolerates any rank
    pub fn pseudo_inverse(rows: usize, cols: usize) -> Self {
        Self::for_shape(rows, cols).with_pivoting(QrpConfig::default())
    }

    pub fn with_memory_preference(mut self, rows: usize, cols: usize, pref: MemoryPreference) -> Self {
        self.strategy = select_strategy(rows, cols, pref);
        self
    }

    pub fn with_strategy(mut self, strategy: QrStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub fn with_pivoting(mut self, pivoting: QrpConfig) -> Self {
        self.pivoting = Some(pivoting);
        self
    }
}

/// Build the solver described by `config`
pub fn linear_solver<T: Scalar>(config: SolverConfig) -> Box<dyn LinearSolver<T> + Send> {
    if let Some(qrp) = config.pivoting {
        return Box::new(QrpSolver::<T>::from_config(qrp));
    }
    match config.strategy {
        QrStrategy::HouseholderColumn => {
            Box::new(QrHouseColSolver::<T>::new().with_parallelism(config.parallelism))
        }
        QrStrategy::HouseholderTran => Box::new(QrHouseTranSolver::<T>::new()),
        block @ QrStrategy::Block { .. } => Box::new(QrSolver::new(block.build::<T>())),
    }
}
