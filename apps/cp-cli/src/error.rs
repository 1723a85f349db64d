//! Error type for the command-line front end.

/// Wraps backend errors behind one interface for the CLI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(#[from] cp_project::ProjectError),

    #[error("Simulation error: {0}")]
    Simulation(#[from] cp_sim::SimError),

    #[error("Results error: {0}")]
    Results(#[from] cp_results::ResultsError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for CLI operations.
pub type AppResult<T> = Result<T, AppError>;
