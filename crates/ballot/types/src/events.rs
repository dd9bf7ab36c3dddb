//! Event types for ballot notifications
//!
//! Every successful mutation emits exactly one event. Envelopes carry a
//! per-registry sequence number so observers can detect gaps.

use crate::{ProposalId, VoterId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Envelope wrapping every ballot event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallotEventEnvelope {
    /// Position in the registry's event stream, starting at 1
    pub sequence: u64,

    /// Event timestamp
    pub emitted_at: DateTime<Utc>,

    /// The actual event
    pub event: BallotEvent,
}

impl BallotEventEnvelope {
    pub fn new(sequence: u64, event: BallotEvent) -> Self {
        Self {
            sequence,
            emitted_at: Utc::now(),
            event,
        }
    }
}

/// Ballot notifications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BallotEvent {
    /// A proposal was appended to the ballot
    ProposalCreated { proposal_id: ProposalId, name: String },

    /// A registered voter cast their vote
    VoteCast {
        voter: VoterId,
        proposal_id: ProposalId,
    },

    /// An identity became an eligible voter
    VoterRegistered { voter: VoterId },

    /// The administrator opened or closed voting
    VotingStatusChanged { active: bool },
}

impl BallotEvent {
    /// Stable name of the event kind, used in logs and CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            BallotEvent::ProposalCreated { .. } => "proposal_created",
            BallotEvent::VoteCast { .. } => "vote_cast",
            BallotEvent::VoterRegistered { .. } => "voter_registered",
            BallotEvent::VotingStatusChanged { .. } => "voting_status_changed",
        }
    }
}
