//! Scripted ballot sessions
//!
//! A session script names the administrator and lists calls in order. The
//! CLI plays the role of the access layer: each step carries the caller
//! identity that would normally come from an authenticated transport.

use std::collections::BTreeMap;
use std::sync::Arc;

use ballot_registry::{
    BallotError, BallotEventEnvelope, BallotRegistry, BallotSnapshot, EventRecorder, Proposal,
    ProposalId, RegistryConfig, VoterId, VoterRecord, WinningProposal,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CliError, CliResult};

/// A scripted session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionScript {
    /// Administrator of the ballot created for this session
    pub administrator: VoterId,

    /// Calls to apply, in order
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One call against the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    RegisterVoter { caller: VoterId, voter: VoterId },
    CreateProposal { caller: VoterId, name: String },
    SetVotingStatus { caller: VoterId, active: bool },
    Vote { caller: VoterId, proposal_id: ProposalId },
}

impl Step {
    pub fn operation(&self) -> &'static str {
        match self {
            Step::RegisterVoter { .. } => "register_voter",
            Step::CreateProposal { .. } => "create_proposal",
            Step::SetVotingStatus { .. } => "set_voting_status",
            Step::Vote { .. } => "vote",
        }
    }

    pub fn caller(&self) -> &VoterId {
        match self {
            Step::RegisterVoter { caller, .. }
            | Step::CreateProposal { caller, .. }
            | Step::SetVotingStatus { caller, .. }
            | Step::Vote { caller, .. } => caller,
        }
    }

    pub fn apply(&self, registry: &BallotRegistry) -> Result<(), BallotError> {
        match self {
            Step::RegisterVoter { caller, voter } => registry.register_voter(caller, voter),
            Step::CreateProposal { caller, name } => {
                registry.create_proposal(caller, name).map(|_| ())
            }
            Step::SetVotingStatus { caller, active } => {
                registry.set_voting_status(caller, *active)
            }
            Step::Vote {
                caller,
                proposal_id,
            } => registry.vote(caller, *proposal_id),
        }
    }
}

/// Outcome of one step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepReport {
    pub index: usize,
    pub operation: String,
    pub caller: VoterId,
    /// `ok` or the error kind
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StepReport {
    pub fn is_ok(&self) -> bool {
        self.outcome == "ok"
    }
}

/// Everything the presentation layer shows after a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub administrator: VoterId,
    pub voting_active: bool,
    pub steps: Vec<StepReport>,
    pub proposals: Vec<Proposal>,
    /// `None` means "no winner yet" (the ballot has no proposals)
    pub winner: Option<WinningProposal>,
    pub voters: BTreeMap<VoterId, VoterRecord>,
    pub events: Vec<BallotEventEnvelope>,
}

impl SessionReport {
    /// Read the current ballot state into a report.
    pub fn collect(registry: &BallotRegistry, steps: Vec<StepReport>) -> CliResult<Self> {
        let snapshot = registry.snapshot()?;
        let winner = match registry.get_winning_proposal() {
            Ok(winner) => Some(winner),
            Err(BallotError::NoProposals) => None,
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            administrator: snapshot.administrator,
            voting_active: snapshot.voting_active,
            steps,
            proposals: snapshot.proposals,
            winner,
            voters: snapshot.voters,
            events: Vec::new(),
        })
    }
}

/// Apply every step of `steps` to `registry`.
///
/// Rejected steps are recorded and the session continues, unless
/// `fail_fast` is set.
pub fn apply_steps(
    registry: &BallotRegistry,
    steps: &[Step],
    fail_fast: bool,
) -> CliResult<Vec<StepReport>> {
    let mut reports = Vec::with_capacity(steps.len());

    for (index, step) in steps.iter().enumerate() {
        let result = step.apply(registry);
        debug!(index, operation = step.operation(), ok = result.is_ok(), "Step applied");

        let report = match result {
            Ok(()) => StepReport {
                index,
                operation: step.operation().to_string(),
                caller: step.caller().clone(),
                outcome: "ok".to_string(),
                message: None,
            },
            Err(BallotError::LockPoisoned) => return Err(BallotError::LockPoisoned.into()),
            Err(source) if fail_fast => {
                return Err(CliError::StepRejected {
                    index,
                    operation: step.operation(),
                    source,
                });
            }
            Err(e) => StepReport {
                index,
                operation: step.operation().to_string(),
                caller: step.caller().clone(),
                outcome: e.kind().to_string(),
                message: Some(e.to_string()),
            },
        };
        reports.push(report);
    }

    Ok(reports)
}

/// Run a whole script against a fresh registry.
///
/// Returns the report (including every emitted event, in sequence order)
/// and the final snapshot of the ballot.
pub fn run_script(
    script: &SessionScript,
    registry_config: RegistryConfig,
    fail_fast: bool,
) -> CliResult<(SessionReport, BallotSnapshot)> {
    let recorder = Arc::new(EventRecorder::new());
    let registry = BallotRegistry::with_config(script.administrator.clone(), registry_config)
        .with_sink(recorder.clone());

    let steps = apply_steps(&registry, &script.steps, fail_fast)?;
    let mut report = SessionReport::collect(&registry, steps)?;
    report.events = recorder.events();

    Ok((report, registry.snapshot()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballot_registry::BallotEvent;

    fn script() -> SessionScript {
        serde_json::from_str(
            r#"{
                "administrator": "owner",
                "steps": [
                    {"op": "register_voter", "caller": "owner", "voter": "voter1"},
                    {"op": "create_proposal", "caller": "owner", "name": "A"},
                    {"op": "create_proposal", "caller": "voter1", "name": "X"},
                    {"op": "vote", "caller": "voter1", "proposal_id": 0},
                    {"op": "set_voting_status", "caller": "owner", "active": true},
                    {"op": "vote", "caller": "voter1", "proposal_id": 0},
                    {"op": "vote", "caller": "voter3", "proposal_id": 0}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn steps_parse_from_tagged_json() {
        let script = script();
        assert_eq!(script.administrator, VoterId::from("owner"));
        assert_eq!(script.steps.len(), 7);
        assert_eq!(
            script.steps[3],
            Step::Vote {
                caller: VoterId::from("voter1"),
                proposal_id: ProposalId::new(0),
            }
        );
    }

    #[test]
    fn rejected_steps_are_reported_and_session_continues() {
        let registry = BallotRegistry::new("owner");
        let reports = apply_steps(&registry, &script().steps, false).unwrap();

        let outcomes: Vec<_> = reports.iter().map(|r| r.outcome.as_str()).collect();
        assert_eq!(
            outcomes,
            vec![
                "ok",
                "ok",
                "unauthorized",
                "voting_closed",
                "ok",
                "ok",
                "not_registered"
            ]
        );
        assert!(reports[2].message.as_deref().unwrap().contains("voter1"));
        assert_eq!(registry.get_proposal(ProposalId::new(0)).unwrap().vote_count, 1);
    }

    #[test]
    fn fail_fast_stops_at_first_rejection() {
        let registry = BallotRegistry::new("owner");
        let err = apply_steps(&registry, &script().steps, true).unwrap_err();

        match err {
            CliError::StepRejected {
                index, operation, ..
            } => {
                assert_eq!(index, 2);
                assert_eq!(operation, "create_proposal");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(registry.proposal_count().unwrap(), 1);
    }

    #[test]
    fn report_without_proposals_has_no_winner() {
        let registry = BallotRegistry::new("owner");
        let report = SessionReport::collect(&registry, Vec::new()).unwrap();
        assert!(report.winner.is_none());
        assert!(report.proposals.is_empty());
    }

    #[test]
    fn run_script_observes_every_successful_mutation() {
        let (report, snapshot) = run_script(&script(), RegistryConfig::default(), false).unwrap();

        let kinds: Vec<_> = report.events.iter().map(|e| e.event.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                "voter_registered",
                "proposal_created",
                "voting_status_changed",
                "vote_cast"
            ]
        );
        assert_eq!(
            report.events.last().unwrap().event,
            BallotEvent::VoteCast {
                voter: VoterId::from("voter1"),
                proposal_id: ProposalId::new(0),
            }
        );
        assert_eq!(report.winner.unwrap().vote_count, 1);
        assert_eq!(snapshot.total_votes(), 1);
    }

    #[test]
    fn run_script_keeps_events_beyond_channel_capacity() {
        let steps = (0..1100)
            .map(|n| Step::RegisterVoter {
                caller: VoterId::from("owner"),
                voter: VoterId::new(format!("voter{}", n)),
            })
            .collect();
        let script = SessionScript {
            administrator: VoterId::from("owner"),
            steps,
        };
        let config = RegistryConfig {
            trace_events: false,
            ..RegistryConfig::default()
        };
        assert!(script.steps.len() > config.event_channel_capacity);

        let (report, _) = run_script(&script, config, true).unwrap();

        assert_eq!(report.steps.len(), 1100);
        assert_eq!(report.events.len(), 1100);
        let sequences: Vec<_> = report.events.iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, (1..=1100).collect::<Vec<u64>>());
    }
}
