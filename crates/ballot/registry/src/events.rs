//! Notification sinks for ballot events
//!
//! The registry delivers each envelope synchronously, while it still holds
//! the write lock of the mutation that produced it. Sinks must therefore
//! return quickly and never call back into the registry. A sink that panics
//! loses that envelope; the registry and the other sinks carry on.

use ballot_types::{BallotEvent, BallotEventEnvelope};
use std::sync::Mutex;
use tokio::sync::broadcast;
use tracing::info;

/// Receiver of ballot notifications
pub trait EventSink: Send + Sync {
    /// Deliver one envelope. Delivery cannot fail from the registry's
    /// point of view.
    fn deliver(&self, envelope: &BallotEventEnvelope);
}

/// Broadcast channel for asynchronous observers
pub struct EventBus {
    sender: broadcast::Sender<BallotEventEnvelope>,
}

impl EventBus {
    /// Create a bus buffering up to `capacity` undelivered envelopes per
    /// subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to envelopes emitted after this call
    pub fn subscribe(&self) -> broadcast::Receiver<BallotEventEnvelope> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl EventSink for EventBus {
    fn deliver(&self, envelope: &BallotEventEnvelope) {
        // No subscribers is fine
        let _ = self.sender.send(envelope.clone());
    }
}

/// Writes every event to the tracing subscriber
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn deliver(&self, envelope: &BallotEventEnvelope) {
        let sequence = envelope.sequence;
        match &envelope.event {
            BallotEvent::ProposalCreated { proposal_id, name } => {
                info!(sequence, proposal_id = %proposal_id, name = %name, "ProposalCreated");
            }
            BallotEvent::VoteCast { voter, proposal_id } => {
                info!(sequence, voter = %voter, proposal_id = %proposal_id, "VoteCast");
            }
            BallotEvent::VoterRegistered { voter } => {
                info!(sequence, voter = %voter, "VoterRegistered");
            }
            BallotEvent::VotingStatusChanged { active } => {
                info!(sequence, active, "VotingStatusChanged");
            }
        }
    }
}

/// Keeps every delivered envelope in memory
#[derive(Debug, Default)]
pub struct EventRecorder {
    events: Mutex<Vec<BallotEventEnvelope>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// All envelopes recorded so far, in delivery order
    pub fn events(&self) -> Vec<BallotEventEnvelope> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Recorded events without their envelopes
    pub fn kinds(&self) -> Vec<BallotEvent> {
        self.events().into_iter().map(|e| e.event).collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|events| events.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl EventSink for EventRecorder {
    fn deliver(&self, envelope: &BallotEventEnvelope) {
        if let Ok(mut events) = self.events.lock() {
            events.push(envelope.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballot_types::VoterId;

    fn registered(sequence: u64, voter: &str) -> BallotEventEnvelope {
        BallotEventEnvelope::new(
            sequence,
            BallotEvent::VoterRegistered {
                voter: VoterId::from(voter),
            },
        )
    }

    #[test]
    fn bus_without_subscribers_accepts_events() {
        let bus = EventBus::new(8);
        assert_eq!(bus.subscriber_count(), 0);
        bus.deliver(&registered(1, "voter1"));
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let bus = EventBus::new(0);
        let mut rx = bus.subscribe();
        bus.deliver(&registered(1, "voter1"));
        assert_eq!(rx.try_recv().unwrap().sequence, 1);
    }

    #[tokio::test]
    async fn bus_fans_out_to_every_subscriber() {
        let bus = EventBus::new(8);
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.deliver(&registered(1, "voter1"));

        assert_eq!(first.recv().await.unwrap().sequence, 1);
        assert_eq!(second.recv().await.unwrap().sequence, 1);
    }

    #[test]
    fn recorder_keeps_delivery_order() {
        let recorder = EventRecorder::new();
        assert!(recorder.is_empty());

        recorder.deliver(&registered(1, "a"));
        recorder.deliver(&registered(2, "b"));

        let sequences: Vec<_> = recorder.events().iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, vec![1, 2]);
        assert_eq!(recorder.len(), 2);

        recorder.clear();
        assert!(recorder.is_empty());
    }

    #[test]
    fn tracing_sink_accepts_every_kind() {
        let sink = TracingSink;
        sink.deliver(&registered(1, "voter1"));
        sink.deliver(&BallotEventEnvelope::new(
            2,
            BallotEvent::VotingStatusChanged { active: true },
        ));
    }
}
