use thiserror::Error;

use crate::validation::ValidationReport;

/// Errors from intake processing.
///
/// Classification itself never fails; these come from the optional strict
/// checks and from decoding stored data.
#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("answer set incomplete: {0}")]
    Incomplete(ValidationReport),

    #[error("malformed answer data: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, IntakeError>;
