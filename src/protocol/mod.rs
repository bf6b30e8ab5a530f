//! Chat protocol
//!
//! Newline-delimited text: inbound framing and outbound message rendering.

pub mod framing;
pub mod message;

pub use framing::LineFramer;
pub use message::{Message, MessageKind, TIMESTAMP_FORMAT};
