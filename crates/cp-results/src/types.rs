//! Result data types.

use cp_project::ModelDef;
use cp_sim::{MassPointState, total_energy};
use serde::{Deserialize, Serialize};

pub type RunId = String;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunManifest {
    pub run_id: RunId,
    pub project_name: String,
    pub timestamp: String,
    pub params: RunParams,
    pub solver_version: String,
    pub frames_recorded: usize,
    /// Hex SHA-256 over every recorded value, see [`crate::trajectory_fingerprint`]
    pub fingerprint: String,
}

/// Parameters that, together with the project, determine a trajectory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunParams {
    pub frame_dt_s: f64,
    pub frames: usize,
    pub record_every: usize,
    pub sub_steps: usize,
    pub model: ModelDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrajectoryRecord {
    pub frame: usize,
    pub time_s: f64,
    pub points: Vec<PointSnapshot>,
    pub total_energy_j: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PointSnapshot {
    pub index: usize,
    pub x_m: f64,
    pub y_m: f64,
    pub angle_rad: f64,
    pub angular_velocity_rad_s: f64,
}

impl TrajectoryRecord {
    pub fn from_states(frame: usize, time_s: f64, states: &[MassPointState], gravity: f64) -> Self {
        Self {
            frame,
            time_s,
            points: states
                .iter()
                .enumerate()
                .map(|(index, s)| PointSnapshot {
                    index,
                    x_m: s.position.x,
                    y_m: s.position.y,
                    angle_rad: s.angle,
                    angular_velocity_rad_s: s.angular_velocity,
                })
                .collect(),
            total_energy_j: total_energy(states, gravity),
        }
    }
}

/// Named per-point variable for series extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesVariable {
    X,
    Y,
    Angle,
    AngularVelocity,
    /// Whole-chain value; the point index is ignored
    Energy,
}

impl SeriesVariable {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "x" => Some(Self::X),
            "y" => Some(Self::Y),
            "angle" => Some(Self::Angle),
            "angular_velocity" | "omega" => Some(Self::AngularVelocity),
            "energy" => Some(Self::Energy),
            _ => None,
        }
    }
}

/// `(time, value)` pairs for one point and variable.
///
/// Returns `None` when `index` is outside the chain.
pub fn extract_series(
    records: &[TrajectoryRecord],
    index: usize,
    variable: SeriesVariable,
) -> Option<Vec<(f64, f64)>> {
    records
        .iter()
        .map(|r| {
            let value = match variable {
                SeriesVariable::Energy => r.total_energy_j,
                _ => {
                    let p = r.points.get(index)?;
                    match variable {
                        SeriesVariable::X => p.x_m,
                        SeriesVariable::Y => p.y_m,
                        SeriesVariable::Angle => p.angle_rad,
                        SeriesVariable::AngularVelocity => p.angular_velocity_rad_s,
                        SeriesVariable::Energy => r.total_energy_j,
                    }
                }
            };
            Some((r.time_s, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cp_sim::{MassPointConfig, PendulumSim, SimOptions};

    fn records() -> Vec<TrajectoryRecord> {
        let mut sim = PendulumSim::new(
            vec![
                MassPointConfig::new(1.0, 1.0, 30.0, 0.0),
                MassPointConfig::new(1.0, 0.5, 0.0, 0.0),
            ],
            SimOptions::default(),
        )
        .unwrap();
        let mut out = vec![TrajectoryRecord::from_states(0, 0.0, sim.states(), 9.81)];
        for frame in 1..=3 {
            sim.step(0.01).unwrap();
            out.push(TrajectoryRecord::from_states(frame, sim.time(), sim.states(), 9.81));
        }
        out
    }

    #[test]
    fn record_copies_positions_and_energy() {
        let recs = records();

        let first = &recs[0];
        assert_eq!(first.points.len(), 2);
        assert!((first.points[0].x_m - 0.5).abs() < 1e-12);
        assert!(first.total_energy_j < 0.0);
    }

    #[test]
    fn series_extraction_by_variable() {
        let recs = records();

        let xs = extract_series(&recs, 1, SeriesVariable::X).unwrap();
        assert_eq!(xs.len(), 4);
        assert_eq!(xs[2].1, recs[2].points[1].x_m);

        let energy = extract_series(&recs, 99, SeriesVariable::Energy).unwrap();
        assert_eq!(energy[0].1, recs[0].total_energy_j);

        assert!(extract_series(&recs, 2, SeriesVariable::Angle).is_none());
    }

    #[test]
    fn parses_variable_names() {
        assert_eq!(SeriesVariable::parse("omega"), Some(SeriesVariable::AngularVelocity));
        assert_eq!(SeriesVariable::parse("y"), Some(SeriesVariable::Y));
        assert_eq!(SeriesVariable::parse("pressure"), None);
    }
}
