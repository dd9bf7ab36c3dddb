//! Scripted session command

use std::path::Path;

use tracing::info;

use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{print_report, OutputFormat};
use crate::session::{run_script, SessionScript};

/// Execute the run command
pub fn execute(
    config: &CliConfig,
    script_path: &Path,
    fail_fast: bool,
    snapshot_out: Option<&Path>,
    format: OutputFormat,
) -> CliResult<()> {
    let script = load_script(script_path)?;
    info!(
        script = %script_path.display(),
        steps = script.steps.len(),
        "Running session script"
    );

    let (report, snapshot) = run_script(&script, config.registry.clone(), fail_fast)?;

    if let Some(path) = snapshot_out {
        std::fs::write(path, serde_json::to_string_pretty(&snapshot)?)?;
        info!(path = %path.display(), "Snapshot written");
    }

    print_report(&report, format)
}

pub fn load_script(path: &Path) -> CliResult<SessionScript> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
