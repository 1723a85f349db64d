//! TransientModel trait and the pendulum chain's first-order system.

use crate::dynamics::{AccelerationModel, compute_accelerations};
use crate::error::SimResult;
use crate::state::MassPointState;

/// Trait for transient (dynamic) system models.
///
/// A TransientModel must implement:
/// - State type (Clone, for snapshots)
/// - Initial state
/// - RHS (right-hand side) computation: x_dot = f(t, x)
/// - Scalar field arithmetic for integration: add states, scale by scalar
pub trait TransientModel {
    /// State type (must be Clone).
    type State: Clone;

    /// Return the state the model was built from.
    fn initial_state(&self) -> Self::State;

    /// Compute state derivative dxdt = f(t, x).
    ///
    /// Takes &mut self so models can reuse scratch storage between calls.
    fn rhs(&mut self, t: f64, x: &Self::State) -> SimResult<Self::State>;

    /// Add two states element-wise: result = a + b.
    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State;

    /// Scale a state by a scalar: result = scale * a.
    fn scale(&self, a: &Self::State, scale: f64) -> Self::State;
}

/// Joint angle/velocity vector of the whole chain.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PhaseState {
    /// θ per link (rad)
    pub angles: Vec<f64>,
    /// ω per link (rad/s)
    pub velocities: Vec<f64>,
}

impl PhaseState {
    pub fn len(&self) -> usize {
        self.angles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }
}

/// First-order system `dθ/dt = ω`, `dω/dt = α(θ, ω)` for a fixed chain.
///
/// Masses and rod lengths are captured once; trial angles and velocities
/// are written into a private copy of the states before each acceleration
/// evaluation.
pub struct ChainModel {
    scratch: Vec<MassPointState>,
    model: AccelerationModel,
    gravity: f64,
}

impl ChainModel {
    pub fn new(states: &[MassPointState], model: AccelerationModel, gravity: f64) -> Self {
        Self {
            scratch: states.to_vec(),
            model,
            gravity,
        }
    }
}

impl TransientModel for ChainModel {
    type State = PhaseState;

    fn initial_state(&self) -> Self::State {
        PhaseState {
            angles: self.scratch.iter().map(|p| p.angle).collect(),
            velocities: self.scratch.iter().map(|p| p.angular_velocity).collect(),
        }
    }

    fn rhs(&mut self, _t: f64, x: &Self::State) -> SimResult<Self::State> {
        for (i, point) in self.scratch.iter_mut().enumerate() {
            point.angle = x.angles[i];
            point.angular_velocity = x.velocities[i];
        }
        let accelerations = compute_accelerations(self.model, &self.scratch, self.gravity)?;
        Ok(PhaseState {
            angles: x.velocities.clone(),
            velocities: accelerations,
        })
    }

    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State {
        PhaseState {
            angles: a.angles.iter().zip(&b.angles).map(|(x, y)| x + y).collect(),
            velocities: a
                .velocities
                .iter()
                .zip(&b.velocities)
                .map(|(x, y)| x + y)
                .collect(),
        }
    }

    fn scale(&self, a: &Self::State, scale: f64) -> Self::State {
        PhaseState {
            angles: a.angles.iter().map(|x| x * scale).collect(),
            velocities: a.velocities.iter().map(|x| x * scale).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Chain, MassPointConfig};

    #[test]
    fn rhs_returns_velocities_and_accelerations() {
        let chain = Chain::from_configs(&[MassPointConfig::new(1.0, 1.0, 30.0, 0.7)]).unwrap();
        let mut model = ChainModel::new(chain.states(), AccelerationModel::Reference, 9.81);
        let x = model.initial_state();

        let dx = model.rhs(0.0, &x).unwrap();

        assert_eq!(dx.angles, vec![0.7]);
        let expected = -9.81 * 30.0_f64.to_radians().sin();
        assert!((dx.velocities[0] - expected).abs() < 1e-12);
    }

    #[test]
    fn add_and_scale_are_element_wise() {
        let model = ChainModel::new(&[], AccelerationModel::Reference, 9.81);
        let a = PhaseState {
            angles: vec![1.0, 2.0],
            velocities: vec![3.0, 4.0],
        };
        let b = PhaseState {
            angles: vec![0.5, 0.5],
            velocities: vec![-1.0, 1.0],
        };

        let sum = model.add(&a, &model.scale(&b, 2.0));

        assert_eq!(sum.angles, vec![2.0, 3.0]);
        assert_eq!(sum.velocities, vec![1.0, 6.0]);
    }
}
