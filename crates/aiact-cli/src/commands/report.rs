//! Compliance report package commands

use aiact_reports::ReportService;
use chrono::{DateTime, Utc};
use clap::Subcommand;
use colored::Colorize;

use crate::error::CliResult;
use crate::output::{heading, print_structured, OutputFormat};

/// Report subcommands
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Generate and archive a compliance package
    Generate {
        /// AI system to generate the package for
        ai_system_id: String,
    },

    /// List archived packages, newest first
    List {
        /// AI system whose packages to list
        ai_system_id: String,
    },

    /// List the archive across all AI systems, newest first
    Archive,
}

/// Execute report command
pub async fn execute(
    command: ReportCommands,
    config_path: Option<&str>,
    format: OutputFormat,
) -> CliResult<()> {
    let service = ReportService::new(super::connect(config_path)?);

    match command {
        ReportCommands::Generate { ai_system_id } => generate(&service, &ai_system_id, format).await,
        ReportCommands::List { ai_system_id } => list(&service, &ai_system_id, format).await,
        ReportCommands::Archive => archive(&service, format).await,
    }
}

pub(crate) fn timestamp(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(|| "-".to_string(), |at| at.format("%Y-%m-%d %H:%M").to_string())
}

async fn generate(service: &ReportService, ai_system_id: &str, format: OutputFormat) -> CliResult<()> {
    let package = service.generate(ai_system_id).await?;
    if print_structured(&package, format)? {
        return Ok(());
    }

    heading("Compliance Package Generated", 60);
    println!("  {}: {}", "Name".bold(), package.pdf_name);
    println!("  {}: {}", "PDF".bold(), package.pdf_url);
    println!("  {}: {}", "JSON".bold(), package.json_url);
    println!(
        "  {}: {}",
        "Generated".bold(),
        package.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    Ok(())
}

async fn list(service: &ReportService, ai_system_id: &str, format: OutputFormat) -> CliResult<()> {
    let packages = service.list(ai_system_id).await?;
    if print_structured(&serde_json::json!({ "rows": packages }), format)? {
        return Ok(());
    }

    heading(&format!("Compliance Packages for {}", ai_system_id), 60);
    if packages.is_empty() {
        println!("  {}", "No packages generated yet.".dimmed());
        return Ok(());
    }

    for package in &packages {
        println!(
            "  {} {}",
            timestamp(package.generated_at).yellow(),
            package.pdf_name.as_deref().unwrap_or("(unnamed)").bold()
        );
        if let Some(url) = &package.pdf_url {
            println!("      pdf:  {}", url.dimmed());
        }
        if let Some(url) = &package.json_url {
            println!("      json: {}", url.dimmed());
        }
    }

    Ok(())
}

async fn archive(service: &ReportService, format: OutputFormat) -> CliResult<()> {
    let entries = service.archive().await?;
    if print_structured(&serde_json::json!({ "rows": entries }), format)? {
        return Ok(());
    }

    heading("Compliance Package Archive", 70);
    if entries.is_empty() {
        println!("  {}", "No packages generated yet.".dimmed());
        return Ok(());
    }

    for entry in &entries {
        println!(
            "  {} {} {}",
            timestamp(entry.generated_at).yellow(),
            entry.ai_system_name.as_deref().unwrap_or("(unnamed system)").bold(),
            entry.pdf_name.as_deref().unwrap_or("").dimmed()
        );
        if let Some(url) = &entry.pdf_url {
            println!("      pdf:  {}", url.dimmed());
        }
    }

    Ok(())
}
