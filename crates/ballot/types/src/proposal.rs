//! Proposal types
//!
//! A Proposal is a named option voters can choose. Its tally only changes
//! through vote casting; proposals are never renamed or deleted.

use crate::ProposalId;
use serde::{Deserialize, Serialize};

/// A proposal and its current tally
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Sequential identifier
    pub id: ProposalId,

    /// Display name, never empty
    pub name: String,

    /// Number of votes cast for this proposal
    pub vote_count: u64,
}

impl Proposal {
    pub fn new(id: ProposalId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            vote_count: 0,
        }
    }

    pub fn view(&self) -> ProposalView {
        ProposalView {
            name: self.name.clone(),
            vote_count: self.vote_count,
        }
    }
}

/// Read-only view returned by proposal lookups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalView {
    pub name: String,
    pub vote_count: u64,
}

/// The current leader of the ballot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinningProposal {
    pub id: ProposalId,
    pub name: String,
    pub vote_count: u64,
}

impl From<&Proposal> for WinningProposal {
    fn from(proposal: &Proposal) -> Self {
        Self {
            id: proposal.id,
            name: proposal.name.clone(),
            vote_count: proposal.vote_count,
        }
    }
}
