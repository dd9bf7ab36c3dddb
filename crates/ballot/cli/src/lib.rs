//! Ballot CLI - Command-line front end for the ballot registry
//!
//! This CLI is the presentation layer around a single in-process ballot:
//! - Run the interactive walkthrough (`demo`)
//! - Execute a scripted session of administrator and voter calls (`run`)
//! - Validate and display a persisted snapshot (`inspect`)

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod session;

pub use config::{CliConfig, LoggingConfig};
pub use error::{CliError, CliResult};
pub use output::OutputFormat;
pub use session::{SessionReport, SessionScript, Step, StepReport};

/// Ballot CLI application
#[derive(Parser)]
#[command(name = "ballotctl")]
#[command(about = "ballotctl - Single-ballot voter registry", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "BALLOT_CONFIG", global = true)]
    config: Option<String>,

    /// Log level (overrides the configuration file)
    #[arg(long, env = "BALLOT_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, global = true)]
    json_logs: bool,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Walk through a complete ballot with three voters and three proposals
    Demo,

    /// Execute a scripted session
    Run {
        /// Session script (JSON)
        script: PathBuf,

        /// Stop at the first rejected step
        #[arg(long)]
        fail_fast: bool,

        /// Write the final ballot snapshot to this path
        #[arg(long)]
        snapshot_out: Option<PathBuf>,
    },

    /// Validate a snapshot and show its tally
    Inspect {
        /// Snapshot file (JSON)
        snapshot: PathBuf,
    },
}

/// Run using the current process arguments.
pub fn run() -> CliResult<()> {
    run_with_args(std::env::args_os())
}

/// Run using the provided argument iterator.
pub fn run_with_args<I, T>(args: I) -> CliResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    let config = CliConfig::load(cli.config.as_deref())?;

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    init_tracing(&level, cli.json_logs || config.logging.json);

    match cli.command {
        Commands::Demo => commands::demo::execute(&config, cli.output),
        Commands::Run {
            script,
            fail_fast,
            snapshot_out,
        } => commands::run::execute(
            &config,
            &script,
            fail_fast,
            snapshot_out.as_deref(),
            cli.output,
        ),
        Commands::Inspect { snapshot } => commands::inspect::execute(&config, &snapshot, cli.output),
    }
}

fn init_tracing(level: &str, json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.to_string().into());

    // A subscriber may already be installed when embedded; keep it.
    let _ = if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
}
