//! Mechanical energy of the chain.
//!
//! Positions and Cartesian velocities are rebuilt from the angles, so the
//! values do not depend on when `position` was last refreshed.

use crate::kinematics::chain_positions;
use crate::state::MassPointState;
use nalgebra::Vector2;

/// Kinetic energy: Σ ½ m_i |v_i|², with v_i = Σ_{j ≤ i} L_j ω_j (cos θ_j, sin θ_j).
pub fn kinetic_energy(states: &[MassPointState]) -> f64 {
    let mut v = Vector2::zeros();
    let mut ke = 0.0;
    for s in states {
        v += Vector2::new(s.angle.cos(), s.angle.sin()) * (s.rod_length * s.angular_velocity);
        ke += 0.5 * s.mass * v.norm_squared();
    }
    ke
}

/// Gravitational potential energy relative to the anchor: Σ m_i g y_i.
pub fn potential_energy(states: &[MassPointState], gravity: f64) -> f64 {
    chain_positions(states)
        .iter()
        .zip(states)
        .map(|(p, s)| s.mass * gravity * p.y)
        .sum()
}

/// Total mechanical energy (kinetic + potential).
pub fn total_energy(states: &[MassPointState], gravity: f64) -> f64 {
    kinetic_energy(states) + potential_energy(states, gravity)
}
