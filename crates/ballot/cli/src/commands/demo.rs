//! Demo walkthrough
//!
//! Registers three voters, creates three proposals, opens voting, casts
//! one vote per voter and closes voting again.

use ballot_registry::{ProposalId, VoterId};
use tracing::info;

use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{print_report, OutputFormat};
use crate::session::{run_script, SessionScript, Step};

const PROPOSALS: [&str; 3] = [
    "Increase funding for renewable energy projects",
    "Implement universal basic income program",
    "Build new public transportation infrastructure",
];

/// Votes cast by voter1, voter2 and voter3 respectively
const CHOICES: [u64; 3] = [0, 1, 0];

/// The walkthrough as a session script.
pub fn demo_script() -> SessionScript {
    let owner = VoterId::from("owner");
    let voters: Vec<VoterId> = (1..=3).map(|n| VoterId::new(format!("voter{}", n))).collect();

    let mut steps = Vec::new();
    for voter in &voters {
        steps.push(Step::RegisterVoter {
            caller: owner.clone(),
            voter: voter.clone(),
        });
    }
    for name in PROPOSALS {
        steps.push(Step::CreateProposal {
            caller: owner.clone(),
            name: name.to_string(),
        });
    }
    steps.push(Step::SetVotingStatus {
        caller: owner.clone(),
        active: true,
    });
    for (voter, choice) in voters.iter().zip(CHOICES) {
        steps.push(Step::Vote {
            caller: voter.clone(),
            proposal_id: ProposalId::new(choice),
        });
    }
    steps.push(Step::SetVotingStatus {
        caller: owner.clone(),
        active: false,
    });

    SessionScript {
        administrator: owner,
        steps,
    }
}

/// Execute the demo command
pub fn execute(config: &CliConfig, format: OutputFormat) -> CliResult<()> {
    let script = demo_script();
    info!(steps = script.steps.len(), "Running demo walkthrough");

    let (report, _) = run_script(&script, config.registry.clone(), true)?;
    print_report(&report, format)
}
