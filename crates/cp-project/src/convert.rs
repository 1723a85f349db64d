//! Mapping from the file schema onto simulation inputs.

use crate::schema::{ModelDef, Project};
use cp_core::{deg, kg, m, rad_per_s};
use cp_sim::{AccelerationModel, MassPointConfig, SimOptions};

pub fn to_configs(project: &Project) -> Vec<MassPointConfig> {
    project
        .mass_points
        .iter()
        .map(|p| {
            MassPointConfig::from_quantities(
                kg(p.mass_kg),
                m(p.rod_length_m),
                deg(p.initial_angle_deg),
                rad_per_s(p.initial_angular_velocity_rad_s),
            )
        })
        .collect()
}

pub fn to_sim_options(project: &Project) -> SimOptions {
    SimOptions {
        sub_steps: project.sub_steps,
        gravity: project.gravity_m_s2,
        model: match project.model {
            ModelDef::Reference => AccelerationModel::Reference,
            ModelDef::FullLagrangian => AccelerationModel::FullLagrangian,
        },
        ..SimOptions::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{MassPointDef, RunDef};

    fn project() -> Project {
        Project {
            version: 1,
            name: "Double".to_string(),
            gravity_m_s2: 9.81,
            sub_steps: 8,
            model: ModelDef::FullLagrangian,
            run: RunDef::default(),
            mass_points: vec![
                MassPointDef {
                    mass_kg: 1.0,
                    rod_length_m: 1.0,
                    initial_angle_deg: 45.0,
                    initial_angular_velocity_rad_s: 0.0,
                },
                MassPointDef {
                    mass_kg: 2.0,
                    rod_length_m: 0.5,
                    initial_angle_deg: -10.0,
                    initial_angular_velocity_rad_s: 1.5,
                },
            ],
        }
    }

    #[test]
    fn mass_points_map_in_order() {
        let configs = to_configs(&project());

        assert_eq!(configs.len(), 2);
        assert_eq!(configs[1].mass, 2.0);
        assert_eq!(configs[1].rod_length, 0.5);
        assert!((configs[1].initial_angle_degrees + 10.0).abs() < 1e-9);
        assert_eq!(configs[1].initial_angular_velocity, 1.5);
    }

    #[test]
    fn options_carry_project_settings() {
        let opts = to_sim_options(&project());

        assert_eq!(opts.sub_steps, 8);
        assert_eq!(opts.gravity, 9.81);
        assert_eq!(opts.model, AccelerationModel::FullLagrangian);
        assert!(opts.check_finite);
    }
}
