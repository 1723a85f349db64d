//! Project schema definitions.

use serde::{Deserialize, Serialize};

/// Newest schema version this crate reads and writes.
pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub version: u32,
    pub name: String,
    #[serde(default = "default_gravity")]
    pub gravity_m_s2: f64,
    #[serde(default = "default_sub_steps")]
    pub sub_steps: usize,
    #[serde(default)]
    pub model: ModelDef,
    #[serde(default)]
    pub run: RunDef,
    #[serde(default)]
    pub mass_points: Vec<MassPointDef>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModelDef {
    #[default]
    Reference,
    FullLagrangian,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MassPointDef {
    pub mass_kg: f64,
    pub rod_length_m: f64,
    pub initial_angle_deg: f64,
    #[serde(default)]
    pub initial_angular_velocity_rad_s: f64,
}

/// Headless run parameters used by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunDef {
    #[serde(default = "default_frame_dt")]
    pub frame_dt_s: f64,
    #[serde(default = "default_frames")]
    pub frames: usize,
    #[serde(default = "default_record_every")]
    pub record_every: usize,
}

impl Default for RunDef {
    fn default() -> Self {
        Self {
            frame_dt_s: default_frame_dt(),
            frames: default_frames(),
            record_every: default_record_every(),
        }
    }
}

fn default_gravity() -> f64 {
    cp_core::constants::G_MPS2
}

fn default_sub_steps() -> usize {
    4
}

fn default_frame_dt() -> f64 {
    1.0 / 60.0
}

fn default_frames() -> usize {
    600
}

fn default_record_every() -> usize {
    1
}
