//! Forward kinematics: generalized angles to absolute 2D positions.
//!
//! Each link hangs from the resolved position of the previous one, starting
//! at the fixed anchor in the origin:
//!
//! ```text
//! p_i = p_{i-1} + L_i * (sin θ_i, -cos θ_i),   p_{-1} = (0, 0)
//! ```

use crate::state::MassPointState;
use nalgebra::Vector2;

/// Position of one link's mass relative to its own pivot.
#[inline]
pub fn link_offset(angle: f64, rod_length: f64) -> Vector2<f64> {
    Vector2::new(angle.sin(), -angle.cos()) * rod_length
}

/// Absolute positions of every mass, in chain order.
pub fn chain_positions(states: &[MassPointState]) -> Vec<Vector2<f64>> {
    let mut anchor = Vector2::zeros();
    states
        .iter()
        .map(|s| {
            anchor += link_offset(s.angle, s.rod_length);
            anchor
        })
        .collect()
}

/// Recompute `position` for every state in place.
pub fn compute_positions(states: &mut [MassPointState]) {
    let mut anchor = Vector2::zeros();
    for state in states.iter_mut() {
        state.position = anchor + link_offset(state.angle, state.rod_length);
        anchor = state.position;
    }
}
