//! Ballot Registry - State machine for a single ballot
//!
//! This crate provides the ballot core:
//!
//! - **BallotRegistry**: Voter registration, proposal creation, the voting
//!   window, vote casting, tallies and the winning proposal
//! - **EventSink**: Notification boundary; every successful mutation is
//!   delivered to the configured sinks in mutation order
//! - **RegistryConfig**: Tunables supplied by the embedding application
//!
//! ## Access Control
//!
//! The registry never authenticates. Callers pass the identity that an
//! outer access layer has already verified, and the registry compares it
//! against the administrator fixed at creation.
//!
//! ## Concurrency
//!
//! All state lives behind one `RwLock`. Mutations hold the write lock for
//! their guard checks, their effect and event delivery, so no reader ever
//! observes a tally that disagrees with the voter records.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod config;
pub mod error;
pub mod events;
pub mod registry;

// Re-exports
pub use ballot_types::{
    BallotEvent, BallotEventEnvelope, BallotSnapshot, Proposal, ProposalId, ProposalView,
    VoterId, VoterRecord, WinningProposal,
};
pub use config::RegistryConfig;
pub use error::{BallotError, Result};
pub use events::{EventBus, EventRecorder, EventSink, TracingSink};
pub use registry::BallotRegistry;
