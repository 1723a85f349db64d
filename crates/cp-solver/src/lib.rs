//! Dense linear-system solver for the chain acceleration models.
//!
//! The general-case equations of motion produce a small dense system
//! `A·α = b` every time accelerations are evaluated. This crate solves it
//! with Gaussian elimination and partial pivoting on private copies of the
//! inputs, using nalgebra containers for storage.

pub mod error;
pub mod linear;

pub use error::{SolverError, SolverResult};
pub use linear::{DEFAULT_PIVOT_TOL, residual_norm, solve, solve_checked};
