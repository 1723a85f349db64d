//! Simulation session and headless frame driver.

use crate::dynamics::AccelerationModel;
use crate::energy::total_energy;
use crate::error::{SimError, SimResult};
use crate::integrator::{Integrator, RK4};
use crate::model::{ChainModel, TransientModel};
use crate::state::{Chain, MassPointConfig, MassPointSnapshot, MassPointState};
use cp_core::constants::G_MPS2;
use cp_core::first_non_finite;

/// Options fixed for the lifetime of a session.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// RK4 sub-steps per frame
    pub sub_steps: usize,
    /// Gravitational acceleration (m/s²)
    pub gravity: f64,
    /// Equations of motion
    pub model: AccelerationModel,
    /// Report non-finite state after a frame as an error
    pub check_finite: bool,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            sub_steps: 4,
            gravity: G_MPS2,
            model: AccelerationModel::default(),
            check_finite: true,
        }
    }
}

impl SimOptions {
    pub fn validate(&self) -> SimResult<()> {
        if self.sub_steps == 0 {
            return Err(SimError::InvalidArg {
                what: "sub_steps must be positive",
            });
        }
        if !self.gravity.is_finite() || self.gravity <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "gravity must be positive and finite",
            });
        }
        Ok(())
    }
}

/// One pendulum chain driven frame by frame by its host.
///
/// The session owns the chain. Angles and velocities change only in
/// [`PendulumSim::step`]; positions are recomputed at the end of each step.
#[derive(Clone, Debug)]
pub struct PendulumSim {
    configs: Vec<MassPointConfig>,
    chain: Chain,
    options: SimOptions,
    time: f64,
    frame: u64,
}

impl PendulumSim {
    pub fn new(configs: Vec<MassPointConfig>, options: SimOptions) -> SimResult<Self> {
        options.validate()?;
        let chain = Chain::from_configs(&configs)?;
        tracing::info!(
            links = chain.len(),
            sub_steps = options.sub_steps,
            model = ?options.model,
            "pendulum session created"
        );
        Ok(Self {
            configs,
            chain,
            options,
            time: 0.0,
            frame: 0,
        })
    }

    /// Advance the chain by `frame_dt` seconds.
    ///
    /// The frame is split into `sub_steps` equal RK4 steps. When
    /// `check_finite` is set and the committed state contains NaN/Inf, the
    /// state is kept as computed and [`SimError::NumericalInstability`] is
    /// returned; calling [`PendulumSim::reset`] is up to the caller.
    pub fn step(&mut self, frame_dt: f64) -> SimResult<()> {
        if !frame_dt.is_finite() || frame_dt < 0.0 {
            return Err(SimError::InvalidArg {
                what: "frame dt must be finite and non-negative",
            });
        }

        let sub_steps = self.options.sub_steps;
        let dt = frame_dt / sub_steps as f64;
        let mut model = ChainModel::new(
            self.chain.states(),
            self.options.model,
            self.options.gravity,
        );
        let mut x = model.initial_state();
        let mut t = self.time;
        for _ in 0..sub_steps {
            x = RK4.step(&mut model, t, &x, dt)?;
            t += dt;
        }

        self.chain.commit(&x);
        self.chain.update_positions();
        self.time += frame_dt;
        self.frame += 1;

        tracing::debug!(frame = self.frame, t = self.time, dt = frame_dt, "frame stepped");

        if self.options.check_finite {
            let bad = first_non_finite(&x.angles)
                .map(|i| ("angle", i))
                .or_else(|| first_non_finite(&x.velocities).map(|i| ("angular velocity", i)));
            if let Some((field, index)) = bad {
                tracing::warn!(frame = self.frame, index, field, "non-finite chain state");
                return Err(SimError::NumericalInstability {
                    frame: self.frame,
                    what: format!("{field} of mass point {index} is not finite"),
                });
            }
        }

        Ok(())
    }

    /// Restore the state cloned from the configs at creation.
    pub fn reset(&mut self) -> SimResult<()> {
        self.chain = Chain::from_configs(&self.configs)?;
        self.time = 0.0;
        self.frame = 0;
        tracing::info!(links = self.chain.len(), "pendulum session reset");
        Ok(())
    }

    pub fn states(&self) -> &[MassPointState] {
        self.chain.states()
    }

    /// Positions and angular velocities as of the last completed step.
    pub fn snapshots(&self) -> Vec<MassPointSnapshot> {
        self.chain.snapshots()
    }

    pub fn configs(&self) -> &[MassPointConfig] {
        &self.configs
    }

    pub fn options(&self) -> &SimOptions {
        &self.options
    }

    /// Simulated time (s).
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Number of completed frames.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn total_energy(&self) -> f64 {
        total_energy(self.chain.states(), self.options.gravity)
    }
}

/// Record of simulation results.
#[derive(Clone, Debug)]
pub struct SimRecord<S> {
    /// Time points (seconds)
    pub t: Vec<f64>,
    /// State snapshots
    pub x: Vec<S>,
}

/// Drive `frames` fixed frames of length `frame_dt` and record every
/// `record_every`-th one, plus the initial and final frames.
pub fn run_frames(
    sim: &mut PendulumSim,
    frame_dt: f64,
    frames: usize,
    record_every: usize,
) -> SimResult<SimRecord<Vec<MassPointState>>> {
    if record_every == 0 {
        return Err(SimError::InvalidArg {
            what: "record_every must be positive",
        });
    }

    let mut t_record = vec![sim.time()];
    let mut x_record = vec![sim.states().to_vec()];

    for frame in 1..=frames {
        sim.step(frame_dt)?;

        // Record if decimation matches
        if frame % record_every == 0 || frame == frames {
            t_record.push(sim.time());
            x_record.push(sim.states().to_vec());
        }
    }

    Ok(SimRecord {
        t: t_record,
        x: x_record,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_options_defaults() {
        let opts = SimOptions::default();
        assert_eq!(opts.sub_steps, 4);
        assert_eq!(opts.gravity, 9.81);
        assert_eq!(opts.model, AccelerationModel::Reference);
        assert!(opts.check_finite);
    }

    #[test]
    fn sim_options_invalid() {
        let opts = SimOptions {
            sub_steps: 0,
            ..SimOptions::default()
        };
        assert!(PendulumSim::new(vec![], opts).is_err());

        let opts = SimOptions {
            gravity: f64::NAN,
            ..SimOptions::default()
        };
        assert!(PendulumSim::new(vec![], opts).is_err());
    }

    #[test]
    fn rejects_negative_frame_dt() {
        let mut sim = PendulumSim::new(
            vec![MassPointConfig::new(1.0, 1.0, 10.0, 0.0)],
            SimOptions::default(),
        )
        .unwrap();

        assert!(sim.step(-0.1).is_err());
        assert!(sim.step(f64::NAN).is_err());
        assert_eq!(sim.frame(), 0);
    }

    #[test]
    fn empty_chain_steps_without_error() {
        let mut sim = PendulumSim::new(vec![], SimOptions::default()).unwrap();

        sim.step(1.0 / 60.0).unwrap();

        assert!(sim.snapshots().is_empty());
        assert_eq!(sim.frame(), 1);
    }

    #[test]
    fn zero_dt_frame_keeps_state() {
        let mut sim = PendulumSim::new(
            vec![MassPointConfig::new(1.0, 1.0, 20.0, 0.3)],
            SimOptions::default(),
        )
        .unwrap();
        let before = sim.states().to_vec();

        sim.step(0.0).unwrap();

        assert_eq!(sim.states(), &before[..]);
    }

    #[test]
    fn reset_restores_initial_state() {
        let configs = vec![
            MassPointConfig::new(1.0, 1.0, 45.0, 0.0),
            MassPointConfig::new(1.0, 1.0, -30.0, 0.0),
        ];
        let mut sim = PendulumSim::new(configs, SimOptions::default()).unwrap();
        let initial = sim.states().to_vec();

        for _ in 0..10 {
            sim.step(1.0 / 60.0).unwrap();
        }
        assert_ne!(sim.states(), &initial[..]);

        sim.reset().unwrap();

        assert_eq!(sim.states(), &initial[..]);
        assert_eq!(sim.time(), 0.0);
        assert_eq!(sim.frame(), 0);
    }

    #[test]
    fn run_frames_records_initial_decimated_and_final() {
        let mut sim = PendulumSim::new(
            vec![MassPointConfig::new(1.0, 1.0, 10.0, 0.0)],
            SimOptions::default(),
        )
        .unwrap();

        let record = run_frames(&mut sim, 0.01, 25, 10).unwrap();

        // t = 0, 0.10, 0.20, 0.25
        assert_eq!(record.t.len(), 4);
        assert_eq!(record.x.len(), 4);
        assert!((record.t[3] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn run_frames_rejects_zero_decimation() {
        let mut sim = PendulumSim::new(vec![], SimOptions::default()).unwrap();
        assert!(run_frames(&mut sim, 0.01, 5, 0).is_err());
    }
}
