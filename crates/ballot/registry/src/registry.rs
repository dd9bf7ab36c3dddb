//! BallotRegistry - the single-ballot state machine.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use ballot_types::{
    BallotEvent, BallotEventEnvelope, BallotSnapshot, Proposal, ProposalId, ProposalView,
    VoterId, VoterRecord, WinningProposal,
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::config::RegistryConfig;
use crate::error::{BallotError, Result};
use crate::events::{EventBus, EventSink, TracingSink};

/// Registry for one ballot.
///
/// The administrator is fixed at creation and is the only identity allowed
/// to register voters, create proposals and open or close voting. Voting
/// status starts inactive.
pub struct BallotRegistry {
    administrator: VoterId,
    config: RegistryConfig,
    bus: EventBus,
    sinks: Vec<Arc<dyn EventSink>>,
    state: RwLock<BallotState>,
}

#[derive(Default)]
struct BallotState {
    voting_active: bool,
    proposals: Vec<Proposal>,
    voters: HashMap<VoterId, VoterRecord>,
    last_sequence: u64,
}

impl BallotState {
    fn proposal_index(&self, proposal_id: ProposalId) -> Option<usize> {
        proposal_id
            .index()
            .filter(|&index| index < self.proposals.len())
    }
}

impl BallotRegistry {
    /// Create an empty ballot administered by `administrator`.
    pub fn new(administrator: impl Into<VoterId>) -> Self {
        Self::with_config(administrator, RegistryConfig::default())
    }

    pub fn with_config(administrator: impl Into<VoterId>, config: RegistryConfig) -> Self {
        let administrator = administrator.into();
        info!(administrator = %administrator, "Ballot registry created");
        Self::assemble(administrator, config, BallotState::default())
    }

    /// Rebuild a registry from a snapshot.
    ///
    /// The snapshot must satisfy every ballot invariant: dense proposal ids,
    /// non-empty names, and tallies equal to the voter records that
    /// reference each proposal.
    pub fn from_snapshot(snapshot: BallotSnapshot, config: RegistryConfig) -> Result<Self> {
        if let Err(reason) = validate_snapshot(&snapshot) {
            warn!(reason = %reason, "Rejected ballot snapshot");
            return Err(BallotError::CorruptSnapshot(reason));
        }

        info!(
            administrator = %snapshot.administrator,
            proposals = snapshot.proposals.len(),
            voters = snapshot.voters.len(),
            "Ballot registry restored from snapshot"
        );

        let state = BallotState {
            voting_active: snapshot.voting_active,
            proposals: snapshot.proposals,
            voters: snapshot.voters.into_iter().collect(),
            last_sequence: 0,
        };
        Ok(Self::assemble(snapshot.administrator, config, state))
    }

    fn assemble(administrator: VoterId, config: RegistryConfig, state: BallotState) -> Self {
        let mut sinks: Vec<Arc<dyn EventSink>> = Vec::new();
        if config.trace_events {
            sinks.push(Arc::new(TracingSink));
        }
        Self {
            administrator,
            bus: EventBus::new(config.event_channel_capacity),
            config,
            sinks,
            state: RwLock::new(state),
        }
    }

    /// Attach an additional notification sink.
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Subscribe to events emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<BallotEventEnvelope> {
        self.bus.subscribe()
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // =========================================================================
    // ADMINISTRATOR OPERATIONS
    // =========================================================================

    /// Register `voter` as eligible to vote.
    pub fn register_voter(&self, caller: &VoterId, voter: &VoterId) -> Result<()> {
        self.require_administrator("register_voter", caller)?;
        let mut state = self.write()?;

        let record = state.voters.entry(voter.clone()).or_default();
        if record.is_registered {
            return Err(rejected(
                "register_voter",
                BallotError::AlreadyRegistered(voter.clone()),
            ));
        }
        *record = VoterRecord::registered();

        info!(voter = %voter, "Voter registered");
        self.emit(
            &mut state,
            BallotEvent::VoterRegistered {
                voter: voter.clone(),
            },
        );
        Ok(())
    }

    /// Append a proposal and return its id.
    pub fn create_proposal(&self, caller: &VoterId, name: &str) -> Result<ProposalId> {
        self.require_administrator("create_proposal", caller)?;
        if name.trim().is_empty() {
            return Err(rejected(
                "create_proposal",
                BallotError::InvalidArgument("Proposal name cannot be empty".into()),
            ));
        }

        let mut state = self.write()?;
        if let Some(limit) = self.config.max_proposals {
            if state.proposals.len() >= limit {
                return Err(rejected(
                    "create_proposal",
                    BallotError::InvalidArgument(format!("Proposal limit of {} reached", limit)),
                ));
            }
        }

        let proposal_id = ProposalId::new(state.proposals.len() as u64);
        state.proposals.push(Proposal::new(proposal_id, name));

        info!(proposal_id = %proposal_id, name = %name, "Proposal created");
        self.emit(
            &mut state,
            BallotEvent::ProposalCreated {
                proposal_id,
                name: name.to_string(),
            },
        );
        Ok(proposal_id)
    }

    /// Open or close voting. Setting the current value again still emits
    /// a notification.
    pub fn set_voting_status(&self, caller: &VoterId, active: bool) -> Result<()> {
        self.require_administrator("set_voting_status", caller)?;
        let mut state = self.write()?;

        state.voting_active = active;

        info!(active, "Voting status changed");
        self.emit(&mut state, BallotEvent::VotingStatusChanged { active });
        Ok(())
    }

    // =========================================================================
    // VOTER OPERATIONS
    // =========================================================================

    /// Cast `caller`'s single vote for `proposal_id`.
    pub fn vote(&self, caller: &VoterId, proposal_id: ProposalId) -> Result<()> {
        let mut state = self.write()?;

        if !state.voting_active {
            return Err(rejected("vote", BallotError::VotingClosed));
        }

        let record = state.voters.get(caller).copied().unwrap_or_default();
        if !record.can_vote() {
            let err = if record.is_registered {
                BallotError::AlreadyVoted(caller.clone())
            } else {
                BallotError::NotRegistered(caller.clone())
            };
            return Err(rejected("vote", err));
        }

        let Some(index) = state.proposal_index(proposal_id) else {
            return Err(rejected("vote", BallotError::ProposalNotFound(proposal_id)));
        };

        // All guards passed; the two writes below happen under one lock.
        state.proposals[index].vote_count += 1;
        state.voters.insert(
            caller.clone(),
            VoterRecord {
                is_registered: true,
                has_voted: true,
                voted_proposal: Some(proposal_id),
            },
        );

        info!(voter = %caller, proposal_id = %proposal_id, "Vote cast");
        self.emit(
            &mut state,
            BallotEvent::VoteCast {
                voter: caller.clone(),
                proposal_id,
            },
        );
        Ok(())
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub fn administrator(&self) -> &VoterId {
        &self.administrator
    }

    pub fn voting_active(&self) -> Result<bool> {
        Ok(self.read()?.voting_active)
    }

    pub fn proposal_count(&self) -> Result<usize> {
        Ok(self.read()?.proposals.len())
    }

    pub fn get_proposal(&self, proposal_id: ProposalId) -> Result<ProposalView> {
        let state = self.read()?;
        state
            .proposal_index(proposal_id)
            .map(|index| state.proposals[index].view())
            .ok_or(BallotError::ProposalNotFound(proposal_id))
    }

    /// All proposals in ascending id order.
    pub fn proposals(&self) -> Result<Vec<Proposal>> {
        Ok(self.read()?.proposals.clone())
    }

    /// Voter record for `voter`; unseen identities get the default record.
    pub fn get_voter_info(&self, voter: &VoterId) -> Result<VoterRecord> {
        Ok(self
            .read()?
            .voters
            .get(voter)
            .copied()
            .unwrap_or_default())
    }

    /// Proposal with the strictly highest tally. Ties go to the lowest id.
    pub fn get_winning_proposal(&self) -> Result<WinningProposal> {
        let state = self.read()?;
        let (first, rest) = state
            .proposals
            .split_first()
            .ok_or(BallotError::NoProposals)?;

        let mut winner = first;
        for proposal in rest {
            if proposal.vote_count > winner.vote_count {
                winner = proposal;
            }
        }
        Ok(WinningProposal::from(winner))
    }

    /// Consistent image of the whole ballot.
    pub fn snapshot(&self) -> Result<BallotSnapshot> {
        let state = self.read()?;
        Ok(BallotSnapshot {
            administrator: self.administrator.clone(),
            voting_active: state.voting_active,
            proposals: state.proposals.clone(),
            voters: state
                .voters
                .iter()
                .map(|(id, record)| (id.clone(), *record))
                .collect(),
        })
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn require_administrator(&self, operation: &'static str, caller: &VoterId) -> Result<()> {
        if caller == &self.administrator {
            Ok(())
        } else {
            Err(rejected(
                operation,
                BallotError::Unauthorized {
                    caller: caller.clone(),
                },
            ))
        }
    }

    /// Deliver under the caller's write lock so delivery order is mutation order.
    ///
    /// The mutation is already committed here. A panicking sink is logged and
    /// skipped so it cannot poison the state lock.
    fn emit(&self, state: &mut BallotState, event: BallotEvent) {
        state.last_sequence += 1;
        let envelope = BallotEventEnvelope::new(state.last_sequence, event);

        self.bus.deliver(&envelope);
        for sink in &self.sinks {
            let delivered = panic::catch_unwind(AssertUnwindSafe(|| sink.deliver(&envelope)));
            if delivered.is_err() {
                warn!(
                    sequence = envelope.sequence,
                    kind = envelope.event.kind(),
                    "Event sink panicked during delivery"
                );
            }
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BallotState>> {
        self.state.read().map_err(|e| {
            warn!(error = %e, "Ballot state lock poisoned");
            BallotError::LockPoisoned
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BallotState>> {
        self.state.write().map_err(|e| {
            warn!(error = %e, "Ballot state lock poisoned");
            BallotError::LockPoisoned
        })
    }
}

fn rejected(operation: &'static str, err: BallotError) -> BallotError {
    debug!(operation, kind = err.kind(), error = %err, "Ballot operation rejected");
    err
}

fn validate_snapshot(snapshot: &BallotSnapshot) -> std::result::Result<(), String> {
    for (index, proposal) in snapshot.proposals.iter().enumerate() {
        if proposal.id.value() != index as u64 {
            return Err(format!(
                "proposal at position {} has id {}",
                index, proposal.id
            ));
        }
        if proposal.name.trim().is_empty() {
            return Err(format!("proposal {} has an empty name", proposal.id));
        }
    }

    let mut tallies = vec![0u64; snapshot.proposals.len()];
    for (voter, record) in &snapshot.voters {
        match (record.has_voted, record.voted_proposal) {
            (false, None) => {}
            (false, Some(_)) => {
                return Err(format!("voter {} has a proposal but has not voted", voter));
            }
            (true, None) => {
                return Err(format!("voter {} has voted without a proposal", voter));
            }
            (true, Some(proposal_id)) => {
                if !record.is_registered {
                    return Err(format!("voter {} voted without being registered", voter));
                }
                let tally = proposal_id
                    .index()
                    .and_then(|index| tallies.get_mut(index))
                    .ok_or_else(|| {
                        format!("voter {} voted for missing proposal {}", voter, proposal_id)
                    })?;
                *tally += 1;
            }
        }
    }

    for (proposal, counted) in snapshot.proposals.iter().zip(&tallies) {
        if proposal.vote_count != *counted {
            return Err(format!(
                "proposal {} records {} votes but {} voters chose it",
                proposal.id, proposal.vote_count, counted
            ));
        }
    }

    Ok(())
}
