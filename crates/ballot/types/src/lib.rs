//! Ballot Types - Core data model for the ballot registry
//!
//! A ballot is a single election instance: one administrator registers
//! voters, defines proposals and opens or closes the voting window, and
//! every registered voter casts exactly one vote.
//!
//! ## Key Concepts
//!
//! - **VoterId**: Opaque identity of a participant (administrator or voter)
//! - **ProposalId**: Dense sequential proposal index starting at 0
//! - **VoterRecord**: Registration and voting state of one identity
//! - **Proposal**: A named option and its tally
//! - **BallotEvent**: Notifications emitted after each successful mutation
//! - **BallotSnapshot**: Serializable image of the full ballot state

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod events;
pub mod ids;
pub mod proposal;
pub mod snapshot;
pub mod voter;

// Re-export main types
pub use events::{BallotEvent, BallotEventEnvelope};
pub use ids::{ProposalId, VoterId};
pub use proposal::{Proposal, ProposalView, WinningProposal};
pub use snapshot::BallotSnapshot;
pub use voter::VoterRecord;
