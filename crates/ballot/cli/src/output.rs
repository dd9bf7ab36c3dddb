//! Output formatting for CLI

use ballot_registry::{BallotEventEnvelope, Proposal, VoterId, VoterRecord};
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{Table, Tabled};

use crate::error::CliResult;
use crate::session::{SessionReport, StepReport};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Table row for step outcomes
#[derive(Debug, Serialize, Tabled)]
struct StepRow {
    /// Step index
    step: usize,
    /// Operation name
    operation: String,
    /// Calling identity
    caller: String,
    /// `ok` or the error kind
    outcome: String,
    /// Rejection message
    message: String,
}

impl From<&StepReport> for StepRow {
    fn from(step: &StepReport) -> Self {
        Self {
            step: step.index,
            operation: step.operation.clone(),
            caller: step.caller.to_string(),
            outcome: step.outcome.clone(),
            message: step.message.clone().unwrap_or_default(),
        }
    }
}

/// Table row for proposal tallies
#[derive(Debug, Serialize, Tabled)]
struct ProposalRow {
    id: u64,
    name: String,
    votes: u64,
}

impl From<&Proposal> for ProposalRow {
    fn from(proposal: &Proposal) -> Self {
        Self {
            id: proposal.id.value(),
            name: proposal.name.clone(),
            votes: proposal.vote_count,
        }
    }
}

/// Table row for voter records
#[derive(Debug, Serialize, Tabled)]
struct VoterRow {
    voter: String,
    registered: bool,
    voted: bool,
    /// Chosen proposal, `-` before voting
    proposal: String,
}

impl From<(&VoterId, &VoterRecord)> for VoterRow {
    fn from((voter, record): (&VoterId, &VoterRecord)) -> Self {
        Self {
            voter: voter.to_string(),
            registered: record.is_registered,
            voted: record.has_voted,
            proposal: record
                .voted_proposal
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Table row for emitted events
#[derive(Debug, Serialize, Tabled)]
struct EventRow {
    sequence: u64,
    kind: String,
    /// Event payload as JSON
    detail: String,
}

impl From<&BallotEventEnvelope> for EventRow {
    fn from(envelope: &BallotEventEnvelope) -> Self {
        Self {
            sequence: envelope.sequence,
            kind: envelope.event.kind().to_string(),
            detail: serde_json::to_string(&envelope.event).unwrap_or_default(),
        }
    }
}

/// Print a session report in the requested format.
pub fn print_report(report: &SessionReport, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        OutputFormat::Table => print_table(report),
    }
    Ok(())
}

fn print_table(report: &SessionReport) {
    println!("{}", "Ballot".bold().cyan());
    println!("  Administrator: {}", report.administrator);
    println!(
        "  Voting:        {}",
        if report.voting_active {
            "active".green()
        } else {
            "inactive".yellow()
        }
    );
    println!();

    if !report.steps.is_empty() {
        let rejected = report.steps.iter().filter(|s| !s.is_ok()).count();
        println!(
            "{} {}",
            format!("Steps ({})", report.steps.len()).bold(),
            if rejected == 0 {
                "all ok".green()
            } else {
                format!("{} rejected", rejected).red()
            }
        );
        println!("{}", Table::new(report.steps.iter().map(StepRow::from)));
        println!();
    }

    println!("{}", format!("Proposals ({})", report.proposals.len()).bold());
    if !report.proposals.is_empty() {
        println!("{}", proposal_table(&report.proposals));
    }
    println!();

    match &report.winner {
        Some(winner) => println!(
            "{} {} (id {}, {} votes)",
            "Winner:".bold(),
            winner.name.green().bold(),
            winner.id,
            winner.vote_count
        ),
        None => println!("{} {}", "Winner:".bold(), "no winner yet".dimmed()),
    }
    println!();

    println!("{}", format!("Voters ({})", report.voters.len()).bold());
    if !report.voters.is_empty() {
        println!("{}", Table::new(report.voters.iter().map(VoterRow::from)));
    }

    if !report.events.is_empty() {
        println!();
        println!("{}", format!("Events ({})", report.events.len()).bold());
        println!("{}", Table::new(report.events.iter().map(EventRow::from)));
    }
}

fn proposal_table(proposals: &[Proposal]) -> String {
    Table::new(proposals.iter().map(ProposalRow::from)).to_string()
}
