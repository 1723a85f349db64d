//! Transient simulation of a planar serial multi-link pendulum.
//!
//! Provides:
//! - Chain state model (immutable configs, owned runtime states)
//! - Forward kinematics from generalized angles to 2D positions
//! - Acceleration models (closed form for one and two links, dense
//!   linear system for longer chains)
//! - Fixed-step RK4 integrator with per-frame sub-stepping
//! - Energy diagnostics and a headless frame driver

pub mod dynamics;
pub mod energy;
pub mod error;
pub mod integrator;
pub mod kinematics;
pub mod model;
pub mod sim;
pub mod state;

// Re-exports for public API
pub use dynamics::{AccelerationModel, compute_accelerations};
pub use energy::{kinetic_energy, potential_energy, total_energy};
pub use error::{SimError, SimResult};
pub use integrator::{Integrator, RK4};
pub use kinematics::{chain_positions, compute_positions};
pub use model::{ChainModel, PhaseState, TransientModel};
pub use sim::{PendulumSim, SimOptions, SimRecord, run_frames};
pub use state::{Chain, MassPointConfig, MassPointSnapshot, MassPointState};
