//! Module `state`
//!
//! Lifecycle state of one connection and the reasons it can end.

use std::fmt;

/// Lifecycle of a connection handler.
///
/// `Connecting → Registered → Receiving → Closing → Closed`. A handler may
/// also go from `Connecting` or `Registered` straight to `Closing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Registered,
    Receiving,
    Closing,
    Closed,
}

impl ConnectionState {
    /// Returns whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(self, next: ConnectionState) -> bool {
        use ConnectionState::*;
        matches!(
            (self, next),
            (Connecting, Registered)
                | (Connecting, Closing)
                | (Registered, Receiving)
                | (Registered, Closing)
                | (Receiving, Closing)
                | (Closing, Closed)
        )
    }

    pub fn is_terminal(self) -> bool {
        self == ConnectionState::Closed
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Registered => "registered",
            ConnectionState::Receiving => "receiving",
            ConnectionState::Closing => "closing",
            ConnectionState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Why a connection left the receive loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// The peer shut its side down (zero-byte read).
    PeerClosed,
    /// Reading from the socket failed.
    ReadFailed(String),
    /// The byte stream could not be framed into lines.
    FramingFailed(String),
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloseReason::PeerClosed => write!(f, "closed by peer"),
            CloseReason::ReadFailed(e) => write!(f, "read failed: {}", e),
            CloseReason::FramingFailed(e) => write!(f, "framing failed: {}", e),
        }
    }
}
