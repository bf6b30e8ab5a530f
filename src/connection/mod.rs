//! Connection management
//!
//! Handles per-connection lifecycle and the registry of active peers.

pub mod handler;
pub mod registry;
pub mod state;

pub use handler::{handle_client, handle_connection};
pub use registry::ConnectionRegistry;
pub use state::{CloseReason, ConnectionState};
