//! Chain state model: configuration templates and runtime mass points.

use crate::error::{SimError, SimResult};
use crate::model::PhaseState;
use cp_core::units::{Angle, AngularVelocity, Length, Mass};
use cp_core::{ensure_finite, ensure_positive, to_kg, to_m, to_rad_per_s, to_radians};
use nalgebra::Vector2;

/// Immutable template for one link of the chain.
///
/// Index 0 hangs from the fixed anchor at the origin; index `i` hangs from
/// the resolved position of index `i - 1`.
#[derive(Clone, Debug, PartialEq)]
pub struct MassPointConfig {
    /// Point mass (kg)
    pub mass: f64,
    /// Rod length from the previous chain point (m)
    pub rod_length: f64,
    /// Angle from the downward vertical at t=0 (degrees)
    pub initial_angle_degrees: f64,
    /// Angular velocity at t=0 (rad/s)
    pub initial_angular_velocity: f64,
}

impl MassPointConfig {
    pub fn new(
        mass: f64,
        rod_length: f64,
        initial_angle_degrees: f64,
        initial_angular_velocity: f64,
    ) -> Self {
        Self {
            mass,
            rod_length,
            initial_angle_degrees,
            initial_angular_velocity,
        }
    }

    /// Build a config from unit-carrying quantities.
    pub fn from_quantities(
        mass: Mass,
        rod_length: Length,
        initial_angle: Angle,
        initial_angular_velocity: AngularVelocity,
    ) -> Self {
        Self {
            mass: to_kg(mass),
            rod_length: to_m(rod_length),
            initial_angle_degrees: cp_core::to_degrees(initial_angle),
            initial_angular_velocity: to_rad_per_s(initial_angular_velocity),
        }
    }

    /// Initial angle in radians.
    pub fn initial_angle_rad(&self) -> f64 {
        to_radians(cp_core::deg(self.initial_angle_degrees))
    }

    /// Reject non-physical templates before any state is created.
    pub fn validate(&self, index: usize) -> SimResult<()> {
        let invalid = |e: cp_core::CpError| SimError::InvalidConfig {
            index,
            what: e.to_string(),
        };
        ensure_positive(self.mass, "mass").map_err(invalid)?;
        ensure_positive(self.rod_length, "rod length").map_err(invalid)?;
        ensure_finite(self.initial_angle_degrees, "initial angle").map_err(invalid)?;
        ensure_finite(self.initial_angular_velocity, "initial angular velocity")
            .map_err(invalid)?;
        Ok(())
    }
}

/// Runtime record for one link.
///
/// `position` is derived by kinematics after every frame and is never read
/// back by the dynamics.
#[derive(Clone, Debug, PartialEq)]
pub struct MassPointState {
    /// Generalized coordinate θ (rad)
    pub angle: f64,
    /// dθ/dt (rad/s)
    pub angular_velocity: f64,
    pub mass: f64,
    pub rod_length: f64,
    pub position: Vector2<f64>,
}

impl MassPointState {
    pub fn from_config(config: &MassPointConfig) -> Self {
        Self {
            angle: config.initial_angle_rad(),
            angular_velocity: config.initial_angular_velocity,
            mass: config.mass,
            rod_length: config.rod_length,
            position: Vector2::zeros(),
        }
    }
}

/// Read-only view handed to visualization consumers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MassPointSnapshot {
    pub position: Vector2<f64>,
    pub angular_velocity: f64,
}

/// The single owned container for the chain's runtime state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Chain {
    points: Vec<MassPointState>,
}

impl Chain {
    /// Validate every template and clone it into runtime state.
    pub fn from_configs(configs: &[MassPointConfig]) -> SimResult<Self> {
        for (index, config) in configs.iter().enumerate() {
            config.validate(index)?;
        }
        let mut chain = Self {
            points: configs.iter().map(MassPointState::from_config).collect(),
        };
        crate::kinematics::compute_positions(&mut chain.points);
        Ok(chain)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn states(&self) -> &[MassPointState] {
        &self.points
    }

    /// Joint (θ, ω) vector of the chain.
    pub fn phase(&self) -> PhaseState {
        PhaseState {
            angles: self.points.iter().map(|p| p.angle).collect(),
            velocities: self.points.iter().map(|p| p.angular_velocity).collect(),
        }
    }

    /// Write integrated angles and velocities back to every link at once.
    pub(crate) fn commit(&mut self, x: &PhaseState) {
        for (i, point) in self.points.iter_mut().enumerate() {
            point.angle = x.angles[i];
            point.angular_velocity = x.velocities[i];
        }
    }

    pub(crate) fn update_positions(&mut self) {
        crate::kinematics::compute_positions(&mut self.points);
    }

    pub fn snapshots(&self) -> Vec<MassPointSnapshot> {
        self.points
            .iter()
            .map(|p| MassPointSnapshot {
                position: p.position,
                angular_velocity: p.angular_velocity,
            })
            .collect()
    }
}
