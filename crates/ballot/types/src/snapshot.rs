//! Serializable image of a ballot
//!
//! A snapshot is what a persistence collaborator stores: the administrator,
//! the voting flag, the ordered proposal list and the voter map.

use crate::{Proposal, VoterId, VoterRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Full ballot state at one point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotSnapshot {
    /// The only identity allowed to administer the ballot
    pub administrator: VoterId,

    /// Whether votes are currently accepted
    #[serde(default)]
    pub voting_active: bool,

    /// Proposals in ascending id order
    #[serde(default)]
    pub proposals: Vec<Proposal>,

    /// Every identity the ballot has seen
    #[serde(default)]
    pub voters: BTreeMap<VoterId, VoterRecord>,
}

impl BallotSnapshot {
    /// Snapshot of a freshly created ballot.
    pub fn empty(administrator: VoterId) -> Self {
        Self {
            administrator,
            voting_active: false,
            proposals: Vec::new(),
            voters: BTreeMap::new(),
        }
    }

    /// Total number of votes recorded across all proposals.
    pub fn total_votes(&self) -> u64 {
        self.proposals.iter().map(|p| p.vote_count).sum()
    }
}
