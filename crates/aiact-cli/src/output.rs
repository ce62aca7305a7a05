//! Output formatting for CLI

use aiact_intake::RiskTier;
use clap::ValueEnum;
use colored::{ColoredString, Colorize};
use serde::Serialize;

use crate::error::CliResult;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Print `value` as JSON or YAML. Returns `false` for table output so the
/// caller renders its own view.
pub fn print_structured<T: Serialize>(value: &T, format: OutputFormat) -> CliResult<bool> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value)?);
            Ok(true)
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(value)?);
            Ok(true)
        }
        OutputFormat::Table => Ok(false),
    }
}

pub fn heading(title: &str, width: usize) {
    println!("{}", title.bold().cyan());
    println!("{}", "=".repeat(width));
    println!();
}

pub fn tier_label(tier: RiskTier) -> ColoredString {
    match tier {
        RiskTier::Prohibited => tier.as_str().red().bold(),
        RiskTier::HighRisk => tier.as_str().red(),
        RiskTier::LimitedRisk => tier.as_str().yellow(),
        RiskTier::MinimalRisk => tier.as_str().green(),
        RiskTier::Unknown => tier.as_str().dimmed(),
    }
}
