//! Integration tests: whole-session behaviour of the pendulum chain.
//!
//! Covers:
//! - small-angle period of a single pendulum
//! - energy drift for one and two links
//! - rod-length invariant after integration
//! - bit-identical replays
//! - reporting (and silent propagation) of non-finite state

use cp_core::{Tolerances, nearly_equal};
use cp_sim::{
    AccelerationModel, MassPointConfig, PendulumSim, SimError, SimOptions, run_frames,
};

const FRAME_DT: f64 = 1.0 / 60.0;

/// 1% relative energy drift.
const ENERGY_TOL: Tolerances = Tolerances {
    abs: 0.0,
    rel: 0.01,
};

fn sim(configs: Vec<MassPointConfig>, sub_steps: usize) -> PendulumSim {
    let opts = SimOptions {
        sub_steps,
        ..SimOptions::default()
    };
    PendulumSim::new(configs, opts).expect("valid chain")
}

/// Times at which the angle crosses zero going upwards, linearly interpolated.
fn upward_crossings(t: &[f64], angle: &[f64]) -> Vec<f64> {
    let mut out = Vec::new();
    for i in 1..angle.len() {
        if angle[i - 1] < 0.0 && angle[i] >= 0.0 {
            let frac = -angle[i - 1] / (angle[i] - angle[i - 1]);
            out.push(t[i - 1] + frac * (t[i] - t[i - 1]));
        }
    }
    out
}

#[test]
fn single_pendulum_small_angle_period() {
    let mut sim = sim(vec![MassPointConfig::new(1.0, 1.0, 5.0, 0.0)], 4);
    let initial_angle = sim.states()[0].angle;

    let dt = 0.001;
    let record = run_frames(&mut sim, dt, 5000, 1).unwrap();
    let angles: Vec<f64> = record.x.iter().map(|s| s[0].angle).collect();

    let crossings = upward_crossings(&record.t, &angles);
    assert!(crossings.len() >= 2, "expected two full swings");
    let period = crossings[1] - crossings[0];

    let expected = 2.0 * std::f64::consts::PI * (1.0_f64 / 9.81).sqrt();
    assert!(
        ((period - expected) / expected).abs() < 0.02,
        "period {period} vs {expected}"
    );

    // One period after release the angle is back near its start
    let frames_per_period = (period / dt).round() as usize;
    let back = angles[frames_per_period];
    assert!(
        (back - initial_angle).abs() < 0.01,
        "angle after one period {back} vs {initial_angle}"
    );
}

#[test]
fn single_pendulum_energy_drift_is_small() {
    let mut sim = sim(vec![MassPointConfig::new(1.0, 1.0, 60.0, 0.0)], 4);
    let e0 = sim.total_energy();

    // About five periods
    for _ in 0..600 {
        sim.step(FRAME_DT).unwrap();
    }

    let e1 = sim.total_energy();
    assert!(nearly_equal(e0, e1, ENERGY_TOL), "energy {e0} -> {e1}");
}

#[test]
fn double_pendulum_energy_drift_is_small() {
    let configs = vec![
        MassPointConfig::new(1.0, 1.0, 30.0, 0.0),
        MassPointConfig::new(1.0, 1.0, 15.0, 0.0),
    ];
    let mut sim = sim(configs, 8);
    let e0 = sim.total_energy();

    let mut worst: f64 = 0.0;
    for _ in 0..600 {
        sim.step(FRAME_DT).unwrap();
        worst = worst.max(((sim.total_energy() - e0) / e0).abs());
    }

    assert!(worst < 0.01, "worst relative energy drift {worst}");
}

#[test]
fn full_lagrangian_conserves_energy_for_three_links() {
    let configs = vec![
        MassPointConfig::new(1.0, 1.0, 40.0, 0.0),
        MassPointConfig::new(0.8, 0.7, 10.0, 0.0),
        MassPointConfig::new(0.5, 0.5, -20.0, 0.0),
    ];
    let opts = SimOptions {
        sub_steps: 16,
        model: AccelerationModel::FullLagrangian,
        ..SimOptions::default()
    };
    let mut sim = PendulumSim::new(configs, opts).unwrap();
    let e0 = sim.total_energy();

    for _ in 0..300 {
        sim.step(FRAME_DT).unwrap();
    }

    let e1 = sim.total_energy();
    assert!(nearly_equal(e0, e1, ENERGY_TOL), "energy {e0} -> {e1}");
}

#[test]
fn positions_keep_rod_lengths_after_stepping() {
    let configs = vec![
        MassPointConfig::new(1.0, 1.0, 90.0, 0.0),
        MassPointConfig::new(2.0, 0.5, 45.0, 1.0),
        MassPointConfig::new(0.5, 1.5, -30.0, -0.5),
        MassPointConfig::new(1.0, 0.8, 10.0, 0.0),
    ];
    let mut sim = sim(configs, 16);

    for _ in 0..120 {
        sim.step(FRAME_DT).unwrap();

        let mut prev = nalgebra::Vector2::zeros();
        for s in sim.states() {
            assert!(((s.position - prev).norm() - s.rod_length).abs() < 1e-9);
            prev = s.position;
        }
    }
}

#[test]
fn snapshots_mirror_states() {
    let configs = vec![
        MassPointConfig::new(1.0, 1.0, 20.0, 0.0),
        MassPointConfig::new(1.0, 1.0, 20.0, 0.0),
        MassPointConfig::new(1.0, 1.0, 20.0, 0.0),
    ];
    let mut sim = sim(configs, 8);
    sim.step(FRAME_DT).unwrap();

    let snaps = sim.snapshots();

    assert_eq!(snaps.len(), 3);
    for (snap, state) in snaps.iter().zip(sim.states()) {
        assert_eq!(snap.position, state.position);
        assert_eq!(snap.angular_velocity, state.angular_velocity);
    }
}

#[test]
fn identical_runs_are_bit_identical() {
    let configs = vec![
        MassPointConfig::new(1.0, 1.0, 120.0, 0.0),
        MassPointConfig::new(1.5, 0.7, -60.0, 2.0),
        MassPointConfig::new(0.5, 1.2, 30.0, 0.0),
    ];
    let frame_dts = [0.016, 0.017, 0.015, 0.033, 0.016, 0.001];

    let mut a = sim(configs.clone(), 8);
    let mut b = sim(configs, 8);

    for _ in 0..20 {
        for &dt in &frame_dts {
            a.step(dt).unwrap();
            b.step(dt).unwrap();
            for (sa, sb) in a.states().iter().zip(b.states()) {
                assert_eq!(sa.angle.to_bits(), sb.angle.to_bits());
                assert_eq!(sa.angular_velocity.to_bits(), sb.angular_velocity.to_bits());
                assert_eq!(sa.position, sb.position);
            }
        }
    }
}

fn runaway_configs() -> Vec<MassPointConfig> {
    // ω² overflows to infinity on the first evaluation
    vec![
        MassPointConfig::new(1.0, 1.0, 17.0, 1e200),
        MassPointConfig::new(1.0, 1.0, -11.0, 0.0),
    ]
}

#[test]
fn non_finite_state_is_reported() {
    let mut sim = sim(runaway_configs(), 4);

    let err = sim.step(FRAME_DT).unwrap_err();

    assert!(matches!(err, SimError::NumericalInstability { frame: 1, .. }));
    // The contaminated state stays committed for the caller to inspect
    assert_eq!(sim.frame(), 1);
    assert!(
        sim.states()
            .iter()
            .any(|s| !s.angle.is_finite() || !s.angular_velocity.is_finite())
    );

    sim.reset().unwrap();
    assert!(sim.states().iter().all(|s| s.angle.is_finite()));
}

#[test]
fn unchecked_sessions_propagate_non_finite_state() {
    let opts = SimOptions {
        check_finite: false,
        ..SimOptions::default()
    };
    let mut sim = PendulumSim::new(runaway_configs(), opts).unwrap();

    for _ in 0..5 {
        sim.step(FRAME_DT).unwrap();
    }

    assert!(sim.states().iter().all(|s| !s.angle.is_finite()));
}
