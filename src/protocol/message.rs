//! Module `message`
//!
//! Defines the chat messages the server broadcasts and their wire rendering.

use chrono::{DateTime, Local};

use crate::peer::PeerId;

/// Timestamp layout used in the header line of every message.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// What a message announces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageKind {
    Connected,
    Disconnected,
    Chat(String),
}

/// One immutable message, tagged with its origin and the time the server
/// observed it.
#[derive(Debug, Clone)]
pub struct Message {
    origin: PeerId,
    kind: MessageKind,
    timestamp: DateTime<Local>,
}

impl Message {
    pub fn new(origin: PeerId, kind: MessageKind, timestamp: DateTime<Local>) -> Self {
        Self {
            origin,
            kind,
            timestamp,
        }
    }

    pub fn connected(origin: PeerId) -> Self {
        Self::new(origin, MessageKind::Connected, Local::now())
    }

    pub fn disconnected(origin: PeerId) -> Self {
        Self::new(origin, MessageKind::Disconnected, Local::now())
    }

    pub fn chat(origin: PeerId, text: impl Into<String>) -> Self {
        Self::new(origin, MessageKind::Chat(text.into()), Local::now())
    }

    pub fn origin(&self) -> PeerId {
        self.origin
    }

    pub fn kind(&self) -> &MessageKind {
        &self.kind
    }

    /// Renders the message as sent on the wire:
    ///
    /// ```text
    /// (2024-05-01 12:30:05)
    /// Client1: hello
    /// ```
    pub fn render(&self) -> String {
        let header = self.timestamp.format(TIMESTAMP_FORMAT);
        match &self.kind {
            MessageKind::Connected => {
                format!("({})\nServer: {} is connected.\n", header, self.origin)
            }
            MessageKind::Disconnected => {
                format!("({})\nServer: {} is disconnected.\n", header, self.origin)
            }
            MessageKind::Chat(text) => format!("({})\n{}: {}\n", header, self.origin, text),
        }
    }
}
