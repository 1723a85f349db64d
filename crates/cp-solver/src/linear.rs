//! Gaussian elimination with partial pivoting.

use crate::error::{SolverError, SolverResult};
use nalgebra::{DMatrix, DVector};

/// Pivot magnitude below which [`solve_checked`] reports a singular system.
pub const DEFAULT_PIVOT_TOL: f64 = 1e-12;

/// Solve `A·x = b` for a square `A`.
///
/// Works on copies of `a` and `b`; the caller's data is never touched.
/// A zero pivot is not detected here: the division yields NaN/Inf and the
/// non-finite values flow into `x`. Use [`solve_checked`] when the caller
/// wants singular systems reported instead.
pub fn solve(a: &DMatrix<f64>, b: &DVector<f64>) -> SolverResult<DVector<f64>> {
    check_dims(a, b)?;
    eliminate(a.clone(), b.clone(), None)
}

/// Like [`solve`], but fails with [`SolverError::Singular`] as soon as the
/// selected pivot magnitude drops to `pivot_tol` or below.
pub fn solve_checked(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    pivot_tol: f64,
) -> SolverResult<DVector<f64>> {
    check_dims(a, b)?;
    if pivot_tol.is_nan() || pivot_tol < 0.0 {
        return Err(SolverError::ProblemSetup {
            what: format!("pivot tolerance must be non-negative, got {pivot_tol}"),
        });
    }
    eliminate(a.clone(), b.clone(), Some(pivot_tol))
}

/// Euclidean norm of `A·x − b`.
pub fn residual_norm(a: &DMatrix<f64>, x: &DVector<f64>, b: &DVector<f64>) -> f64 {
    (a * x - b).norm()
}

fn check_dims(a: &DMatrix<f64>, b: &DVector<f64>) -> SolverResult<()> {
    if a.nrows() != a.ncols() {
        return Err(SolverError::ProblemSetup {
            what: format!("matrix must be square, got {}x{}", a.nrows(), a.ncols()),
        });
    }
    if a.nrows() != b.len() {
        return Err(SolverError::ProblemSetup {
            what: format!(
                "right-hand side length {} does not match matrix order {}",
                b.len(),
                a.nrows()
            ),
        });
    }
    Ok(())
}

fn eliminate(
    mut m: DMatrix<f64>,
    mut rhs: DVector<f64>,
    pivot_tol: Option<f64>,
) -> SolverResult<DVector<f64>> {
    let n = rhs.len();

    // Forward elimination
    for k in 0..n {
        let mut max = m[(k, k)].abs();
        let mut max_row = k;
        for i in (k + 1)..n {
            let candidate = m[(i, k)].abs();
            if candidate > max {
                max = candidate;
                max_row = i;
            }
        }

        if let Some(tol) = pivot_tol {
            if max.is_nan() || max <= tol {
                tracing::debug!(pivot = k, magnitude = max, "singular pivot");
                return Err(SolverError::Singular {
                    pivot_index: k,
                    magnitude: max,
                });
            }
        }

        if max_row != k {
            for j in k..n {
                m.swap((max_row, j), (k, j));
            }
            rhs.swap_rows(max_row, k);
        }

        for i in (k + 1)..n {
            let factor = m[(i, k)] / m[(k, k)];
            rhs[i] -= factor * rhs[k];
            for j in k..n {
                m[(i, j)] -= factor * m[(k, j)];
            }
        }
    }

    // Back substitution
    let mut x = DVector::zeros(n);
    for i in (0..n).rev() {
        let mut sum = rhs[i];
        for j in (i + 1)..n {
            sum -= m[(i, j)] * x[j];
        }
        x[i] = sum / m[(i, i)];
    }

    Ok(x)
}
