//! End-to-end ballot scenarios.

use std::sync::Arc;

use ballot_registry::{
    BallotError, BallotEvent, BallotRegistry, EventRecorder, ProposalId, VoterId, WinningProposal,
};

fn owner() -> VoterId {
    VoterId::from("owner")
}

fn voter(name: &str) -> VoterId {
    VoterId::from(name)
}

#[test]
fn two_voters_back_the_same_proposal() {
    let registry = BallotRegistry::new(owner());
    registry.register_voter(&owner(), &voter("voter1")).unwrap();
    registry.register_voter(&owner(), &voter("voter2")).unwrap();
    registry.create_proposal(&owner(), "A").unwrap();
    registry.create_proposal(&owner(), "B").unwrap();
    registry.set_voting_status(&owner(), true).unwrap();

    registry.vote(&voter("voter1"), ProposalId::new(0)).unwrap();
    registry.vote(&voter("voter2"), ProposalId::new(0)).unwrap();

    assert_eq!(registry.get_proposal(ProposalId::new(0)).unwrap().vote_count, 2);
    assert_eq!(
        registry.get_winning_proposal().unwrap(),
        WinningProposal {
            id: ProposalId::new(0),
            name: "A".into(),
            vote_count: 2,
        }
    );
}

#[test]
fn unregistered_voter_cannot_vote() {
    let registry = BallotRegistry::new(owner());
    registry.register_voter(&owner(), &voter("voter1")).unwrap();
    registry.create_proposal(&owner(), "A").unwrap();
    registry.set_voting_status(&owner(), true).unwrap();
    let before = registry.snapshot().unwrap();

    let err = registry.vote(&voter("voter3"), ProposalId::new(0)).unwrap_err();

    assert_eq!(err, BallotError::NotRegistered(voter("voter3")));
    assert_eq!(registry.snapshot().unwrap(), before);
}

#[test]
fn closed_ballot_rejects_votes() {
    let registry = BallotRegistry::new(owner());
    registry.register_voter(&owner(), &voter("voter1")).unwrap();
    registry.create_proposal(&owner(), "A").unwrap();
    registry.set_voting_status(&owner(), true).unwrap();
    registry.set_voting_status(&owner(), false).unwrap();

    let err = registry.vote(&voter("voter1"), ProposalId::new(0)).unwrap_err();

    assert_eq!(err, BallotError::VotingClosed);
    assert!(!registry.get_voter_info(&voter("voter1")).unwrap().has_voted);
    assert_eq!(registry.get_proposal(ProposalId::new(0)).unwrap().vote_count, 0);
}

#[test]
fn non_administrator_cannot_create_proposals() {
    let registry = BallotRegistry::new(owner());
    registry.create_proposal(&owner(), "A").unwrap();

    let err = registry.create_proposal(&voter("voter1"), "X").unwrap_err();

    assert_eq!(
        err,
        BallotError::Unauthorized {
            caller: voter("voter1")
        }
    );
    assert_eq!(registry.proposal_count().unwrap(), 1);
}

#[test]
fn tie_between_later_proposals_goes_to_lower_id() {
    let registry = BallotRegistry::new(owner());
    for name in ["v1", "v2", "v3", "v4"] {
        registry.register_voter(&owner(), &voter(name)).unwrap();
    }
    for name in ["A", "B", "C"] {
        registry.create_proposal(&owner(), name).unwrap();
    }
    registry.set_voting_status(&owner(), true).unwrap();

    registry.vote(&voter("v1"), ProposalId::new(2)).unwrap();
    registry.vote(&voter("v2"), ProposalId::new(1)).unwrap();
    registry.vote(&voter("v3"), ProposalId::new(2)).unwrap();
    registry.vote(&voter("v4"), ProposalId::new(1)).unwrap();

    let winner = registry.get_winning_proposal().unwrap();
    assert_eq!(winner.id, ProposalId::new(1));
    assert_eq!(winner.name, "B");
}

#[test]
fn voting_reopens_after_close() {
    let registry = BallotRegistry::new(owner());
    registry.register_voter(&owner(), &voter("voter1")).unwrap();
    registry.create_proposal(&owner(), "A").unwrap();

    registry.set_voting_status(&owner(), true).unwrap();
    registry.set_voting_status(&owner(), false).unwrap();
    registry.set_voting_status(&owner(), true).unwrap();

    registry.vote(&voter("voter1"), ProposalId::new(0)).unwrap();
    assert_eq!(registry.get_proposal(ProposalId::new(0)).unwrap().vote_count, 1);
}

#[test]
fn registration_is_allowed_while_voting_is_open() {
    let registry = BallotRegistry::new(owner());
    registry.create_proposal(&owner(), "A").unwrap();
    registry.set_voting_status(&owner(), true).unwrap();

    registry.register_voter(&owner(), &voter("late")).unwrap();
    registry.vote(&voter("late"), ProposalId::new(0)).unwrap();

    assert!(registry.get_voter_info(&voter("late")).unwrap().has_voted);
}

#[test]
fn full_session_emits_every_notification() {
    let recorder = Arc::new(EventRecorder::new());
    let registry = BallotRegistry::new(owner()).with_sink(recorder.clone());

    registry.register_voter(&owner(), &voter("voter1")).unwrap();
    registry.create_proposal(&owner(), "Proposal A").unwrap();
    registry.set_voting_status(&owner(), true).unwrap();
    registry.vote(&voter("voter1"), ProposalId::new(0)).unwrap();
    registry.set_voting_status(&owner(), false).unwrap();

    let kinds: Vec<_> = recorder.kinds().iter().map(BallotEvent::kind).collect();
    assert_eq!(
        kinds,
        vec![
            "voter_registered",
            "proposal_created",
            "voting_status_changed",
            "vote_cast",
            "voting_status_changed",
        ]
    );
}

#[test]
fn snapshot_survives_json_persistence() {
    let registry = BallotRegistry::new(owner());
    registry.register_voter(&owner(), &voter("voter1")).unwrap();
    registry.create_proposal(&owner(), "A").unwrap();
    registry.set_voting_status(&owner(), true).unwrap();
    registry.vote(&voter("voter1"), ProposalId::new(0)).unwrap();

    let json = serde_json::to_string(&registry.snapshot().unwrap()).unwrap();
    let restored =
        BallotRegistry::from_snapshot(serde_json::from_str(&json).unwrap(), Default::default())
            .unwrap();

    assert_eq!(restored.snapshot().unwrap(), registry.snapshot().unwrap());
}
