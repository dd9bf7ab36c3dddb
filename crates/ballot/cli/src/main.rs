//! ballotctl - Single-ballot voter registry CLI

fn main() -> anyhow::Result<()> {
    ballot_cli::run()?;
    Ok(())
}
