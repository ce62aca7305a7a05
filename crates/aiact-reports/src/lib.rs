//! # aiact-reports
//!
//! Compliance report packages and the AI system registry.
//!
//! Rendering the PDF/JSON artifacts is delegated to a hosted backend
//! function. This crate calls that function, checks its reply, names the
//! package and records it in the `compliance_packages` archive table. It
//! also registers AI systems and stores their computed risk tiers.
//!
//! ## Key Components
//!
//! - [`ReportsConfig`]: backend location and credentials, layered from
//!   defaults, an optional file and the environment
//! - [`ReportBackend`]: transport seam for the function and the archive
//! - [`HttpBackend`]: `reqwest` implementation of [`ReportBackend`]
//! - [`ReportService`]: generate → validate → archive, and archive listing
//! - [`RegistryService`]: system registration and saved risk tiers
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use aiact_reports::{HttpBackend, ReportService, ReportsConfig};
//!
//! # async fn example() -> aiact_reports::Result<()> {
//! let config = ReportsConfig::load(None)?;
//! let service = ReportService::new(Arc::new(HttpBackend::new(config.backend)?));
//!
//! let package = service.generate("3f8e9a52-ai-system").await?;
//! println!("{} -> {}", package.pdf_name, package.pdf_url);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod package;
pub mod registry;
pub mod service;
pub mod transport;

pub use self::config::{BackendConfig, ReportsConfig};
pub use error::{ReportsError, Result};
pub use package::{
    pdf_name, ArchiveEntry, CompliancePackage, FunctionReply, GenerateRequest, GeneratedPackage,
    NewCompliancePackage, PackageStatus, ReportArtifacts, PACKAGE_TABLE,
};
pub use registry::{AiSystem, NewAiSystem, RegistryService, SystemStatus, DEFAULT_AI_SOFTWARE};
pub use service::ReportService;
pub use transport::{HttpBackend, ReportBackend};
