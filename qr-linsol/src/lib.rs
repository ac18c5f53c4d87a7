//! # qr-linsol: linear solvers built on Householder QR
//!
//! Every solver implements [`LinearSolver`]: `set_a` factors the system
//! once, `solve` handles any number of right-hand sides.
//!
//! - [`QrHouseColSolver`]: packed column reflectors, optional rayon parallelism
//! - [`QrHouseTranSolver`]: transposed factor, `Q^H` applied block-wise
//! - [`QrSolver`]: any [`householder_qr::QrDecomposition`] with explicit factors
//! - [`QrpSolver`]: rank-deficient systems, basic or minimum-norm solutions
//! - [`AdjustableQrSolver`]: rows can be added and removed after `set_a`
//!
//! [`linear_solver`] picks one from a [`SolverConfig`].

pub mod adjustable;
pub mod config;
pub mod error;
pub mod house_col;
pub mod house_tran;
pub mod null_space;
pub mod qr;
pub mod qrp;
pub mod solver;

pub use adjustable::AdjustableQrSolver;
pub use config::{linear_solver, SolverConfig};
pub use error::{Result, SolverError};
pub use house_col::QrHouseColSolver;
pub use house_tran::QrHouseTranSolver;
pub use null_space::null_space;
pub use qr::QrSolver;
pub use qrp::{QrpConfig, QrpSolver};
pub use solver::{triangular_quality, LinearSolver};
