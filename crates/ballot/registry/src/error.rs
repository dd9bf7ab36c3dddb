//! Ballot error types

use ballot_types::{ProposalId, VoterId};
use thiserror::Error;

/// Ballot errors
///
/// Every variant is a deterministic rejection: guards run before any state
/// changes, so a failed call leaves the ballot untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BallotError {
    #[error("Unauthorized: {caller} is not the ballot administrator")]
    Unauthorized { caller: VoterId },

    #[error("Voter already registered: {0}")]
    AlreadyRegistered(VoterId),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Voting is not currently active")]
    VotingClosed,

    #[error("Voter not registered: {0}")]
    NotRegistered(VoterId),

    #[error("Voter already voted: {0}")]
    AlreadyVoted(VoterId),

    #[error("Proposal not found: {0}")]
    ProposalNotFound(ProposalId),

    #[error("No proposals exist")]
    NoProposals,

    #[error("Corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    #[error("Lock error")]
    LockPoisoned,
}

impl BallotError {
    /// Stable identifier of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            BallotError::Unauthorized { .. } => "unauthorized",
            BallotError::AlreadyRegistered(_) => "already_registered",
            BallotError::InvalidArgument(_) => "invalid_argument",
            BallotError::VotingClosed => "voting_closed",
            BallotError::NotRegistered(_) => "not_registered",
            BallotError::AlreadyVoted(_) => "already_voted",
            BallotError::ProposalNotFound(_) => "proposal_not_found",
            BallotError::NoProposals => "no_proposals",
            BallotError::CorruptSnapshot(_) => "corrupt_snapshot",
            BallotError::LockPoisoned => "lock_poisoned",
        }
    }
}

/// Result type for ballot operations
pub type Result<T> = std::result::Result<T, BallotError>;
