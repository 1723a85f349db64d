mod error;
mod run_service;

use clap::{Parser, Subcommand, ValueEnum};
use cp_project::ModelDef;
use cp_results::{SeriesVariable, extract_series};
use error::{AppError, AppResult};
use run_service::{RunOptions, RunProgress, RunRequest};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "cp-cli")]
#[command(about = "ChainPend CLI - serial multi-link pendulum simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate project file syntax and values
    Validate {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
    },
    /// Run a simulation and store its trajectory
    Run {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
        /// Number of frames (overrides run.frames)
        #[arg(long)]
        frames: Option<usize>,
        /// Frame length in seconds (overrides run.frame_dt_s)
        #[arg(long)]
        dt: Option<f64>,
        /// RK4 sub-steps per frame (overrides sub_steps)
        #[arg(long)]
        sub_steps: Option<usize>,
        /// Equations of motion (overrides model)
        #[arg(long, value_enum)]
        model: Option<ModelArg>,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
    },
    /// List stored runs for a project
    Runs {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
    },
    /// Show details of a stored run
    ShowRun {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
        /// Run ID to display
        run_id: String,
    },
    /// Export one time series from a stored run as CSV
    ExportSeries {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
        /// Run ID
        run_id: String,
        /// Mass point index (0 = attached to the anchor)
        index: usize,
        /// Variable name (x, y, angle, angular_velocity, energy)
        variable: String,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModelArg {
    Reference,
    FullLagrangian,
}

impl From<ModelArg> for ModelDef {
    fn from(m: ModelArg) -> Self {
        match m {
            ModelArg::Reference => ModelDef::Reference,
            ModelArg::FullLagrangian => ModelDef::FullLagrangian,
        }
    }
}

struct RunOverrides {
    frames: Option<usize>,
    dt: Option<f64>,
    sub_steps: Option<usize>,
    model: Option<ModelArg>,
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Run {
            project_path,
            frames,
            dt,
            sub_steps,
            model,
            no_cache,
        } => cmd_run(
            &project_path,
            RunOverrides {
                frames,
                dt,
                sub_steps,
                model,
            },
            !no_cache,
        ),
        Commands::Runs { project_path } => cmd_runs(&project_path),
        Commands::ShowRun {
            project_path,
            run_id,
        } => cmd_show_run(&project_path, &run_id),
        Commands::ExportSeries {
            project_path,
            run_id,
            index,
            variable,
            output,
        } => cmd_export_series(&project_path, &run_id, index, &variable, output.as_deref()),
    }
}

fn cmd_validate(project_path: &Path) -> AppResult<()> {
    println!("Validating project: {}", project_path.display());
    let project = cp_project::load_project(project_path)?;
    println!("✓ Project is valid");
    println!(
        "  {} mass points, {} sub-steps, {:?} model",
        project.mass_points.len(),
        project.sub_steps,
        project.model
    );
    Ok(())
}

fn cmd_run(project_path: &Path, overrides: RunOverrides, use_cache: bool) -> AppResult<()> {
    let mut project = cp_project::load_project(project_path)?;
    if let Some(frames) = overrides.frames {
        project.run.frames = frames;
    }
    if let Some(dt) = overrides.dt {
        project.run.frame_dt_s = dt;
    }
    if let Some(sub_steps) = overrides.sub_steps {
        project.sub_steps = sub_steps;
    }
    if let Some(model) = overrides.model {
        project.model = model.into();
    }

    println!("Running simulation: {}", project.name);
    println!(
        "  frames = {}, dt = {:.4} s, sub-steps = {}",
        project.run.frames, project.run.frame_dt_s, project.sub_steps
    );

    let request = RunRequest {
        project_path,
        project: &project,
        options: RunOptions {
            use_cache,
            ..RunOptions::default()
        },
    };

    let mut last_emit = Instant::now();
    let response = run_service::ensure_run_with_progress(
        &request,
        Some(&mut |p: RunProgress| {
            if last_emit.elapsed().as_millis() >= 100 || p.frame == p.frames {
                render_cli_progress(&p);
                last_emit = Instant::now();
            }
        }),
    )?;
    clear_progress_line();

    if response.loaded_from_cache {
        println!("✓ Loaded from cache: {}", response.manifest.run_id);
    } else {
        println!("✓ Simulation completed: {}", response.manifest.run_id);
    }
    println!("  Wall time: {:.3}s", response.wall_time_s);
    print_trajectory_summary(&response.manifest, &response.records);

    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}

fn render_cli_progress(p: &RunProgress) {
    let width = 28usize;
    let fraction = p.fraction_complete();
    let filled = ((fraction * width as f64).round() as usize).min(width);
    let bar = format!(
        "{}{}",
        "#".repeat(filled),
        "-".repeat(width.saturating_sub(filled))
    );
    print!(
        "\r[{}] {:>6.2}%  t={:.3}s  frame={}/{}  elapsed={:.1}s",
        bar,
        fraction * 100.0,
        p.sim_time_s,
        p.frame,
        p.frames,
        p.elapsed_wall_s
    );
    let _ = io::stdout().flush();
}

fn print_trajectory_summary(
    manifest: &cp_results::RunManifest,
    records: &[cp_results::TrajectoryRecord],
) {
    println!("  Records: {}", records.len());
    println!("  Fingerprint: {}", manifest.fingerprint);

    let (Some(first), Some(last)) = (records.first(), records.last()) else {
        return;
    };
    println!("  Time range: {:.3} - {:.3} s", first.time_s, last.time_s);

    let e0 = first.total_energy_j;
    let e1 = last.total_energy_j;
    if e0.abs() > 0.0 {
        println!(
            "  Energy: {:.6} J -> {:.6} J ({:+.4}%)",
            e0,
            e1,
            100.0 * (e1 - e0) / e0.abs()
        );
    } else {
        println!("  Energy: {:.6} J -> {:.6} J", e0, e1);
    }

    println!("\nFinal state:");
    for p in &last.points {
        println!(
            "  [{}] x={:+.4} m  y={:+.4} m  θ={:+.4} rad  ω={:+.4} rad/s",
            p.index, p.x_m, p.y_m, p.angle_rad, p.angular_velocity_rad_s
        );
    }
}

fn cmd_runs(project_path: &Path) -> AppResult<()> {
    let runs = run_service::list_runs(project_path)?;

    if runs.is_empty() {
        println!("No stored runs for: {}", project_path.display());
    } else {
        println!("Stored runs:");
        for manifest in runs {
            println!(
                "  {} ({}, {} frames, {:?})",
                manifest.run_id, manifest.timestamp, manifest.params.frames, manifest.params.model
            );
        }
    }
    Ok(())
}

fn cmd_show_run(project_path: &Path, run_id: &str) -> AppResult<()> {
    println!("Loading run: {}", run_id);

    let (manifest, records) = run_service::load_run(project_path, run_id)?;

    println!("\nRun Summary:");
    println!("  Project: {}", manifest.project_name);
    println!("  Created: {}", manifest.timestamp);
    println!("  Solver version: {}", manifest.solver_version);
    println!(
        "  dt = {:.4} s, frames = {}, sub-steps = {}, model = {:?}",
        manifest.params.frame_dt_s,
        manifest.params.frames,
        manifest.params.sub_steps,
        manifest.params.model
    );
    print_trajectory_summary(&manifest, &records);

    Ok(())
}

fn cmd_export_series(
    project_path: &Path,
    run_id: &str,
    index: usize,
    variable: &str,
    output: Option<&Path>,
) -> AppResult<()> {
    let (_manifest, records) = run_service::load_run(project_path, run_id)?;

    let var = SeriesVariable::parse(variable)
        .ok_or_else(|| AppError::InvalidInput(format!("unknown variable '{variable}'")))?;
    let series = extract_series(&records, index, var)
        .ok_or_else(|| AppError::InvalidInput(format!("mass point {index} not in run")))?;

    // Build CSV
    let mut csv = String::from("time_s,value\n");
    for (t, val) in &series {
        csv.push_str(&format!("{},{}\n", t, val));
    }

    // Write to file or stdout
    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!(
            "✓ Exported {} data points to {}",
            series.len(),
            path.display()
        );
    } else {
        print!("{}", csv);
    }

    Ok(())
}
