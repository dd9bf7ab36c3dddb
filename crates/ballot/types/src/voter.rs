//! Voter records

use crate::ProposalId;
use serde::{Deserialize, Serialize};

/// Registration and voting state of one identity.
///
/// Identities the registry has never seen read as the default record
/// (`not registered`, `not voted`, no proposal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VoterRecord {
    pub is_registered: bool,
    pub has_voted: bool,
    pub voted_proposal: Option<ProposalId>,
}

impl VoterRecord {
    /// Record of a freshly registered voter.
    pub fn registered() -> Self {
        Self {
            is_registered: true,
            has_voted: false,
            voted_proposal: None,
        }
    }

    /// Whether this identity may still cast a vote.
    pub fn can_vote(&self) -> bool {
        self.is_registered && !self.has_voted
    }
}
