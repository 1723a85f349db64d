//! Project validation logic.

use crate::schema::{LATEST_VERSION, MassPointDef, Project, RunDef};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version == 0 || project.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    positive("gravity_m_s2".to_string(), project.gravity_m_s2)?;

    if project.sub_steps == 0 {
        return Err(ValidationError::InvalidValue {
            field: "sub_steps".to_string(),
            value: "0".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    validate_run(&project.run)?;

    for (index, point) in project.mass_points.iter().enumerate() {
        validate_mass_point(index, point)?;
    }

    Ok(())
}

fn validate_run(run: &RunDef) -> Result<(), ValidationError> {
    positive("run.frame_dt_s".to_string(), run.frame_dt_s)?;
    if run.record_every == 0 {
        return Err(ValidationError::InvalidValue {
            field: "run.record_every".to_string(),
            value: "0".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn validate_mass_point(index: usize, point: &MassPointDef) -> Result<(), ValidationError> {
    positive(format!("mass_points[{index}].mass_kg"), point.mass_kg)?;
    positive(format!("mass_points[{index}].rod_length_m"), point.rod_length_m)?;
    finite(
        format!("mass_points[{index}].initial_angle_deg"),
        point.initial_angle_deg,
    )?;
    finite(
        format!("mass_points[{index}].initial_angular_velocity_rad_s"),
        point.initial_angular_velocity_rad_s,
    )?;
    Ok(())
}

fn positive(field: String, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field,
            value: value.to_string(),
            reason: "must be positive and finite".to_string(),
        });
    }
    Ok(())
}

fn finite(field: String, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidValue {
            field,
            value: value.to_string(),
            reason: "must be finite".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ModelDef;

    fn project() -> Project {
        Project {
            version: LATEST_VERSION,
            name: "Single".to_string(),
            gravity_m_s2: 9.81,
            sub_steps: 4,
            model: ModelDef::Reference,
            run: RunDef::default(),
            mass_points: vec![MassPointDef {
                mass_kg: 1.0,
                rod_length_m: 1.0,
                initial_angle_deg: 45.0,
                initial_angular_velocity_rad_s: 0.0,
            }],
        }
    }

    #[test]
    fn accepts_valid_project() {
        validate_project(&project()).unwrap();
    }

    #[test]
    fn accepts_empty_chain() {
        let mut p = project();
        p.mass_points.clear();
        validate_project(&p).unwrap();
    }

    #[test]
    fn rejects_future_version() {
        let mut p = project();
        p.version = LATEST_VERSION + 1;
        assert!(matches!(
            validate_project(&p),
            Err(ValidationError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn rejects_zero_sub_steps() {
        let mut p = project();
        p.sub_steps = 0;
        assert!(validate_project(&p).is_err());
    }

    #[test]
    fn rejects_non_positive_mass_with_field_name() {
        let mut p = project();
        p.mass_points[0].mass_kg = 0.0;

        let err = validate_project(&p).unwrap_err();

        assert!(format!("{err}").contains("mass_points[0].mass_kg"));
    }

    #[test]
    fn rejects_negative_rod_length() {
        let mut p = project();
        p.mass_points[0].rod_length_m = -1.0;
        assert!(validate_project(&p).is_err());
    }

    #[test]
    fn rejects_nan_angle() {
        let mut p = project();
        p.mass_points[0].initial_angle_deg = f64::NAN;
        assert!(validate_project(&p).is_err());
    }

    #[test]
    fn rejects_bad_run_settings() {
        let mut p = project();
        p.run.frame_dt_s = 0.0;
        assert!(validate_project(&p).is_err());

        let mut p = project();
        p.run.record_every = 0;
        assert!(validate_project(&p).is_err());
    }
}
