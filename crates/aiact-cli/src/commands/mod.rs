//! CLI command implementations

use std::sync::Arc;

use aiact_reports::{HttpBackend, ReportsConfig};

use crate::error::CliResult;

pub mod intake;
pub mod report;
pub mod system;

/// Load the backend configuration and build the HTTP backend.
pub(crate) fn connect(config_path: Option<&str>) -> CliResult<Arc<HttpBackend>> {
    let config = ReportsConfig::load(config_path)?;
    Ok(Arc::new(HttpBackend::new(config.backend)?))
}
