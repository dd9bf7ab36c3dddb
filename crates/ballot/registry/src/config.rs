//! Configuration for the ballot registry

use serde::{Deserialize, Serialize};

/// Registry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Envelopes buffered per broadcast subscriber before it lags
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,

    /// Optional cap on the number of proposals. Unbounded when unset.
    #[serde(default)]
    pub max_proposals: Option<usize>,

    /// Log every event through `tracing`
    #[serde(default = "default_true")]
    pub trace_events: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            event_channel_capacity: default_event_channel_capacity(),
            max_proposals: None,
            trace_events: true,
        }
    }
}

fn default_event_channel_capacity() -> usize {
    1024
}

fn default_true() -> bool {
    true
}
