//! Error types for simulation operations.

use thiserror::Error;

/// Errors encountered while building or advancing a pendulum chain.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Invalid configuration for mass point {index}: {what}")]
    InvalidConfig { index: usize, what: String },

    #[error("Numerical instability at frame {frame}: {what}")]
    NumericalInstability { frame: u64, what: String },

    #[error("Solver error: {0}")]
    Solver(#[from] cp_solver::SolverError),
}

pub type SimResult<T> = Result<T, SimError>;
