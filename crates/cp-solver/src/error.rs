//! Error types for solver operations.

use thiserror::Error;

/// Errors that can occur during a linear solve.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Problem setup error: {what}")]
    ProblemSetup { what: String },

    #[error("Singular matrix: pivot {pivot_index} has magnitude {magnitude:e}")]
    Singular { pivot_index: usize, magnitude: f64 },
}

pub type SolverResult<T> = Result<T, SolverError>;
