use thiserror::Error;

/// Errors from the registry, report generation and archive access.
#[derive(Error, Debug)]
pub enum ReportsError {
    #[error("Missing ai_system_id")]
    MissingAiSystemId,

    #[error("Name is required.")]
    MissingName,

    #[error("User email not found")]
    MissingOwnerEmail,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("Edge function error: {message}")]
    Function { status: u16, message: String },

    #[error("{0}")]
    InvalidResponse(String),

    #[error("Archive insert failed: {0}")]
    Archive(String),

    #[error("Insert failed: {0}")]
    Write(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReportsError {
    /// HTTP status a proxying handler should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            ReportsError::MissingAiSystemId
            | ReportsError::MissingName
            | ReportsError::MissingOwnerEmail => 400,
            ReportsError::Function { status, .. } => *status,
            _ => 500,
        }
    }
}

impl From<::config::ConfigError> for ReportsError {
    fn from(err: ::config::ConfigError) -> Self {
        ReportsError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ReportsError>;
