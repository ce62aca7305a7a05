//! CLI error types

use thiserror::Error;

/// CLI error type
#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Intake error: {0}")]
    Intake(#[from] aiact_intake::IntakeError),

    #[error("Report error: {0}")]
    Reports(#[from] aiact_reports::ReportsError),

    #[error("answers incomplete: {0} issue(s)")]
    Incomplete(usize),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
