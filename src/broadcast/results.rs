//! Broadcast result types
//!
//! Defines the outcome returned by a broadcast.

use crate::peer::PeerId;

/// Result of delivering one message to a registry snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: Vec<PeerId>,
    pub failed: Vec<PeerId>,
}

impl BroadcastReport {
    /// Number of recipients the message was attempted for.
    pub fn attempted(&self) -> usize {
        self.delivered.len() + self.failed.len()
    }
}
