//! Generalized angular accelerations of the chain.
//!
//! Dispatch is on chain length:
//!
//! | n    | method                                              |
//! |------|-----------------------------------------------------|
//! | 0    | nothing to compute                                  |
//! | 1    | simple pendulum, `α = -(g/L) sin θ`                 |
//! | 2    | closed-form double pendulum                         |
//! | ≥ 3  | dense system `A·α = b` solved by elimination        |
//!
//! The reference general-case system carries gravity only in `b`; the
//! velocity-dependent (Coriolis/centrifugal) coupling is left out. The
//! [`AccelerationModel::FullLagrangian`] variant assembles the complete
//! n-link equations instead and is used for every n ≥ 1.

use crate::error::SimResult;
use crate::state::MassPointState;
use nalgebra::{DMatrix, DVector};

/// Which equations of motion to evaluate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AccelerationModel {
    /// Closed forms for n ≤ 2, gravity-only dense system for n ≥ 3.
    #[default]
    Reference,
    /// Full n-link Lagrangian including velocity coupling.
    FullLagrangian,
}

/// One angular acceleration per link, in chain order.
///
/// Only angle, angular velocity, mass and rod length are read. A singular
/// system is not reported here; NaN/Inf values are returned as computed.
pub fn compute_accelerations(
    model: AccelerationModel,
    states: &[MassPointState],
    gravity: f64,
) -> SimResult<Vec<f64>> {
    match model {
        AccelerationModel::Reference => match states.len() {
            0 => Ok(Vec::new()),
            1 => Ok(vec![single_pendulum(&states[0], gravity)]),
            2 => {
                let (a0, a1) = double_pendulum(&states[0], &states[1], gravity);
                Ok(vec![a0, a1])
            }
            _ => {
                let (a, b) = assemble_reference_system(states, gravity);
                Ok(cp_solver::solve(&a, &b)?.iter().copied().collect())
            }
        },
        AccelerationModel::FullLagrangian => {
            if states.is_empty() {
                return Ok(Vec::new());
            }
            let (a, b) = assemble_lagrangian_system(states, gravity);
            Ok(cp_solver::solve(&a, &b)?.iter().copied().collect())
        }
    }
}

/// `α = -(g/L)·sin θ`
pub fn single_pendulum(p: &MassPointState, gravity: f64) -> f64 {
    -(gravity / p.rod_length) * p.angle.sin()
}

/// Closed-form accelerations of a double pendulum.
pub fn double_pendulum(p0: &MassPointState, p1: &MassPointState, gravity: f64) -> (f64, f64) {
    let g = gravity;
    let (t0, t1) = (p0.angle, p1.angle);
    let (w0, w1) = (p0.angular_velocity, p1.angular_velocity);
    let (m0, m1) = (p0.mass, p1.mass);
    let (l0, l1) = (p0.rod_length, p1.rod_length);

    let delta = t0 - t1;
    let den = (2.0 * m0 + m1) - m1 * (2.0 * delta).cos();

    let a0 = (-g * (2.0 * m0 + m1) * t0.sin()
        - m1 * g * (t0 - 2.0 * t1).sin()
        - 2.0 * delta.sin() * m1 * (w1 * w1 * l1 + w0 * w0 * l0 * delta.cos()))
        / (l0 * den);

    let a1 = (2.0
        * delta.sin()
        * (w0 * w0 * l0 * (m0 + m1) + g * (m0 + m1) * t0.cos() + w1 * w1 * l1 * m1 * delta.cos()))
        / (l1 * den);

    (a0, a1)
}

/// Mass-coupling matrix and gravity forcing of the reference general case.
///
/// For every pair `k >= q` the diagonal gains `m_k L_q²`, and for every
/// `i <= k` the entry `A[q,i]` gains `m_k L_q L_i cos(θ_i - θ_q)` while
/// `b[q]` loses `m_k g L_q sin θ_q`, once per `(q, k, i)` triple.
pub fn assemble_reference_system(
    states: &[MassPointState],
    gravity: f64,
) -> (DMatrix<f64>, DVector<f64>) {
    let n = states.len();
    let mut a = DMatrix::zeros(n, n);
    let mut b = DVector::zeros(n);

    for q in 0..n {
        let lq = states[q].rod_length;
        let tq = states[q].angle;
        for k in q..n {
            let mk = states[k].mass;

            a[(q, q)] += mk * lq * lq;

            for i in 0..=k {
                let li = states[i].rod_length;
                let ti = states[i].angle;

                a[(q, i)] += mk * lq * li * (ti - tq).cos();
                b[q] -= mk * gravity * lq * tq.sin();
            }
        }
    }

    (a, b)
}

/// Complete n-link equations `M(θ)·α = b(θ, ω)`.
///
/// With `μ_ij = Σ_{k ≥ max(i,j)} m_k`:
///
/// ```text
/// M[i,j] = μ_ij L_i L_j cos(θ_i - θ_j)
/// b[i]   = -Σ_j μ_ij L_i L_j sin(θ_i - θ_j) ω_j² - μ_ii g L_i sin θ_i
/// ```
pub fn assemble_lagrangian_system(
    states: &[MassPointState],
    gravity: f64,
) -> (DMatrix<f64>, DVector<f64>) {
    let n = states.len();

    // tail[k] = Σ_{j >= k} m_j
    let mut tail = vec![0.0; n + 1];
    for k in (0..n).rev() {
        tail[k] = tail[k + 1] + states[k].mass;
    }

    let mut a = DMatrix::zeros(n, n);
    let mut b = DVector::zeros(n);

    for i in 0..n {
        let (li, ti) = (states[i].rod_length, states[i].angle);
        for j in 0..n {
            let (lj, tj, wj) = (
                states[j].rod_length,
                states[j].angle,
                states[j].angular_velocity,
            );
            let mu = tail[i.max(j)];
            a[(i, j)] = mu * li * lj * (ti - tj).cos();
            b[i] -= mu * li * lj * (ti - tj).sin() * wj * wj;
        }
        b[i] -= tail[i] * gravity * li * ti.sin();
    }

    (a, b)
}
