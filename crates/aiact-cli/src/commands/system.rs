//! AI system registry commands

use std::path::PathBuf;

use aiact_intake::classify;
use aiact_reports::RegistryService;
use clap::Subcommand;
use colored::Colorize;

use crate::commands::intake::read_answers;
use crate::commands::report::timestamp;
use crate::error::CliResult;
use crate::output::{heading, print_structured, tier_label, OutputFormat};

/// System subcommands
#[derive(Subcommand)]
pub enum SystemCommands {
    /// Register a new AI system as a draft
    Create {
        /// Display name of the system
        name: String,

        /// Owner of the system
        #[arg(long, env = "AIACT_OWNER_EMAIL")]
        owner_email: String,

        /// AI software the system is built on
        #[arg(long)]
        software: Option<String>,
    },

    /// List registered systems, newest first
    List,

    /// Show the latest saved risk tier of a system
    Tier {
        /// AI system to look up
        ai_system_id: String,
    },

    /// Classify an answers file and save the resulting tier
    SaveTier {
        /// AI system the tier belongs to
        ai_system_id: String,

        /// Answers file ("-" reads stdin)
        file: PathBuf,

        /// Input is a list of stored answer rows
        #[arg(long)]
        rows: bool,
    },
}

/// Execute system command
pub async fn execute(
    command: SystemCommands,
    config_path: Option<&str>,
    format: OutputFormat,
) -> CliResult<()> {
    let registry = RegistryService::new(super::connect(config_path)?);

    match command {
        SystemCommands::Create {
            name,
            owner_email,
            software,
        } => {
            let system = registry
                .create_system(&name, &owner_email, software.as_deref())
                .await?;
            if !print_structured(&system, format)? {
                println!("{} AI system registered: {}", "✓".green(), system.id.bold());
            }
            Ok(())
        }
        SystemCommands::List => {
            let systems = registry.list_systems().await?;
            if print_structured(&serde_json::json!({ "rows": systems }), format)? {
                return Ok(());
            }

            heading("AI Systems", 60);
            if systems.is_empty() {
                println!("  {}", "No AI systems registered yet.".dimmed());
            }
            for system in &systems {
                println!(
                    "  {} {} {}",
                    timestamp(system.created_at).yellow(),
                    system.name.as_deref().unwrap_or("(unnamed)").bold(),
                    format!("[{}]", system.status.as_deref().unwrap_or("-")).dimmed()
                );
                println!("      id: {}", system.id);
            }
            Ok(())
        }
        SystemCommands::Tier { ai_system_id } => {
            let tier = registry.latest_tier(&ai_system_id).await?;
            let value = serde_json::json!({
                "ai_system_id": ai_system_id.trim(),
                "risk_tier": tier,
            });
            if !print_structured(&value, format)? {
                println!("  {}: {}", "Tier".bold(), tier_label(tier));
            }
            Ok(())
        }
        SystemCommands::SaveTier {
            ai_system_id,
            file,
            rows,
        } => {
            let result = classify(&read_answers(&file, rows)?);
            registry.save_tier(&ai_system_id, &result).await?;
            if !print_structured(&result, format)? {
                println!("{} saved tier {}", "✓".green(), tier_label(result.risk_tier));
            }
            Ok(())
        }
    }
}
