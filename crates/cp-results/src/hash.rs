//! Content-based hashing for run IDs and trajectory fingerprints.

use crate::types::{RunParams, TrajectoryRecord};
use cp_project::Project;
use sha2::{Digest, Sha256};

pub fn compute_run_id(project: &Project, params: &RunParams, solver_version: &str) -> String {
    let mut hasher = Sha256::new();

    let project_json = serde_json::to_string(project).unwrap_or_default();
    hasher.update(project_json.as_bytes());

    let params_json = serde_json::to_string(params).unwrap_or_default();
    hasher.update(params_json.as_bytes());

    hasher.update(solver_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}

/// SHA-256 over the exact bit patterns of every recorded value.
///
/// Two runs share a fingerprint only if their trajectories are
/// bit-identical.
pub fn trajectory_fingerprint(records: &[TrajectoryRecord]) -> String {
    let mut hasher = Sha256::new();

    for record in records {
        hasher.update((record.frame as u64).to_le_bytes());
        hasher.update(record.time_s.to_bits().to_le_bytes());
        for p in &record.points {
            for v in [p.x_m, p.y_m, p.angle_rad, p.angular_velocity_rad_s] {
                hasher.update(v.to_bits().to_le_bytes());
            }
        }
        hasher.update(record.total_energy_j.to_bits().to_le_bytes());
    }

    format!("{:x}", hasher.finalize())
}
