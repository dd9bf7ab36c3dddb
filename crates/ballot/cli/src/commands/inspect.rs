//! Snapshot inspection command

use std::path::Path;

use ballot_registry::{BallotRegistry, BallotSnapshot};

use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{print_report, OutputFormat};
use crate::session::SessionReport;

/// Execute the inspect command
pub fn execute(config: &CliConfig, path: &Path, format: OutputFormat) -> CliResult<()> {
    let report = inspect(config, path)?;
    print_report(&report, format)
}

/// Load and validate a snapshot, then report its state.
pub fn inspect(config: &CliConfig, path: &Path) -> CliResult<SessionReport> {
    let raw = std::fs::read_to_string(path)?;
    let snapshot: BallotSnapshot = serde_json::from_str(&raw)?;
    let registry = BallotRegistry::from_snapshot(snapshot, config.registry.clone())?;
    SessionReport::collect(&registry, Vec::new())
}
