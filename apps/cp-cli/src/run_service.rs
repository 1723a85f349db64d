//! Run execution and caching service.

use std::path::Path;
use std::time::Instant;

use cp_project::{Project, to_configs, to_sim_options};
use cp_results::{
    RunManifest, RunParams, RunStore, TrajectoryRecord, compute_run_id, trajectory_fingerprint,
};
use cp_sim::PendulumSim;

use crate::error::{AppError, AppResult};

pub const SOLVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Options for running simulations.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub use_cache: bool,
    pub solver_version: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            solver_version: SOLVER_VERSION.to_string(),
        }
    }
}

/// Request to execute a run. `project` already carries any overrides.
pub struct RunRequest<'a> {
    pub project_path: &'a Path,
    pub project: &'a Project,
    pub options: RunOptions,
}

/// Response from a run execution.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub manifest: RunManifest,
    pub records: Vec<TrajectoryRecord>,
    pub loaded_from_cache: bool,
    pub wall_time_s: f64,
}

#[derive(Debug, Clone)]
pub struct RunProgress {
    pub frame: usize,
    pub frames: usize,
    pub sim_time_s: f64,
    pub elapsed_wall_s: f64,
}

impl RunProgress {
    pub fn fraction_complete(&self) -> f64 {
        if self.frames == 0 {
            1.0
        } else {
            self.frame as f64 / self.frames as f64
        }
    }
}

pub fn run_params(project: &Project) -> RunParams {
    RunParams {
        frame_dt_s: project.run.frame_dt_s,
        frames: project.run.frames,
        record_every: project.run.record_every,
        sub_steps: project.sub_steps,
        model: project.model,
    }
}

/// Execute a run, or load it from the store when an identical one exists.
pub fn ensure_run_with_progress(
    request: &RunRequest,
    mut progress_cb: Option<&mut dyn FnMut(RunProgress)>,
) -> AppResult<RunResponse> {
    let started = Instant::now();
    let project = request.project;
    cp_project::validate_project(project).map_err(cp_project::ProjectError::from)?;

    let params = run_params(project);
    let run_id = compute_run_id(project, &params, &request.options.solver_version);
    let store = RunStore::for_project(request.project_path)?;

    if request.options.use_cache && store.has_run(&run_id) {
        tracing::info!(%run_id, "loading cached run");
        let manifest = store.load_manifest(&run_id)?;
        let records = store.load_trajectory(&run_id)?;
        return Ok(RunResponse {
            manifest,
            records,
            loaded_from_cache: true,
            wall_time_s: started.elapsed().as_secs_f64(),
        });
    }

    let options = to_sim_options(project);
    let gravity = options.gravity;
    let mut sim = PendulumSim::new(to_configs(project), options)?;

    let frames = params.frames;
    let mut records = vec![TrajectoryRecord::from_states(
        0,
        sim.time(),
        sim.states(),
        gravity,
    )];

    tracing::info!(%run_id, frames, "running simulation");
    for frame in 1..=frames {
        sim.step(params.frame_dt_s)?;

        if frame % params.record_every == 0 || frame == frames {
            records.push(TrajectoryRecord::from_states(
                frame,
                sim.time(),
                sim.states(),
                gravity,
            ));
        }

        if let Some(cb) = progress_cb.as_deref_mut() {
            cb(RunProgress {
                frame,
                frames,
                sim_time_s: sim.time(),
                elapsed_wall_s: started.elapsed().as_secs_f64(),
            });
        }
    }

    let manifest = RunManifest {
        run_id,
        project_name: project.name.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        params,
        solver_version: request.options.solver_version.clone(),
        frames_recorded: records.len(),
        fingerprint: trajectory_fingerprint(&records),
    };
    store.save_run(&manifest, &records)?;

    Ok(RunResponse {
        manifest,
        records,
        loaded_from_cache: false,
        wall_time_s: started.elapsed().as_secs_f64(),
    })
}

pub fn list_runs(project_path: &Path) -> AppResult<Vec<RunManifest>> {
    Ok(RunStore::for_project(project_path)?.list_runs()?)
}

pub fn load_run(
    project_path: &Path,
    run_id: &str,
) -> AppResult<(RunManifest, Vec<TrajectoryRecord>)> {
    let store = RunStore::for_project(project_path)?;
    if !store.has_run(run_id) {
        return Err(AppError::InvalidInput(format!("no stored run '{run_id}'")));
    }
    let manifest = store.load_manifest(run_id)?;
    let records = store.load_trajectory(run_id)?;
    Ok((manifest, records))
}
