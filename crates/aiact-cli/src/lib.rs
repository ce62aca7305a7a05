//! AI Act CLI - Command-line interface for AI Act compliance intake
//!
//! This CLI provides compliance operators with a terminal interface to:
//! - Inspect the classification questionnaire
//! - Classify and validate questionnaire answers
//! - Convert answers to the stored row shape
//! - Register AI systems and save their risk tiers
//! - Generate and list compliance report packages

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;
mod output;

use commands::{intake, report, system};
pub use error::{CliError, CliResult};

/// AI Act CLI application
#[derive(Parser)]
#[command(name = "aiact")]
#[command(about = "aiact - EU AI Act risk classification and compliance packages", long_about = None)]
#[command(version)]
struct Cli {
    /// Output format (table, json, yaml)
    #[arg(short, long, default_value = "table", global = true)]
    output: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, env = "AIACT_LOG_JSON", global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Show the classification questionnaire
    Questions,

    /// Classify an answers file ("-" reads stdin)
    Classify {
        /// Answers file
        file: PathBuf,

        /// Input is a list of stored answer rows
        #[arg(long)]
        rows: bool,

        /// Refuse to classify incomplete answers
        #[arg(long)]
        strict: bool,
    },

    /// Check answers for missing or invalid values
    Validate {
        /// Answers file
        file: PathBuf,

        /// Input is a list of stored answer rows
        #[arg(long)]
        rows: bool,
    },

    /// Convert an answers file into stored answer rows
    Rows {
        /// AI system the rows belong to
        ai_system_id: String,

        /// Answers file
        file: PathBuf,

        /// Emit the risk tier record of the classification instead
        #[arg(long)]
        tier: bool,
    },

    /// Register AI systems and read or save their risk tiers
    System {
        /// Configuration file path
        #[arg(short, long, env = "AIACT_CONFIG")]
        config: Option<String>,

        #[command(subcommand)]
        command: system::SystemCommands,
    },

    /// Generate and list compliance report packages
    Report {
        /// Configuration file path
        #[arg(short, long, env = "AIACT_CONFIG")]
        config: Option<String>,

        #[command(subcommand)]
        command: report::ReportCommands,
    },
}

/// Run using the current process arguments.
pub async fn run() -> CliResult<()> {
    run_with_args(std::env::args_os()).await
}

/// Run using the provided argument iterator.
pub async fn run_with_args<I, T>(args: I) -> CliResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| filter.into());

    if cli.log_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .ok();
    }

    // Execute command
    match cli.command {
        Commands::Questions => intake::show_questions(cli.output),
        Commands::Classify { file, rows, strict } => {
            intake::classify(&file, rows, strict, cli.output)
        }
        Commands::Validate { file, rows } => intake::validate(&file, rows, cli.output),
        Commands::Rows {
            ai_system_id,
            file,
            tier,
        } => intake::to_rows(&ai_system_id, &file, tier, cli.output),
        Commands::System { config, command } => {
            system::execute(command, config.as_deref(), cli.output).await
        }
        Commands::Report { config, command } => {
            report::execute(command, config.as_deref(), cli.output).await
        }
    }
}
