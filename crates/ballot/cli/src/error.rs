//! CLI error types

use ballot_registry::BallotError;
use thiserror::Error;

/// CLI error type
#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Ballot error: {0}")]
    Ballot(#[from] BallotError),

    #[error("Step {index} ({operation}) rejected: {source}")]
    StepRejected {
        index: usize,
        operation: &'static str,
        source: BallotError,
    },
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
