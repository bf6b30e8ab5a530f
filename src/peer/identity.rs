//! Peer identity
//!
//! Stable per-connection identity used as a registry key and a display label.

use std::fmt;

/// Identity of one connected client, rendered as `Client<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(u64);

impl PeerId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw numeric identity.
    pub fn raw(&self) -> u64 {
        self.0
    }

    /// Returns the human-readable label shown to other clients.
    pub fn label(&self) -> String {
        format!("Client{}", self.0)
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Client{}", self.0)
    }
}
