//! RAX Chat Relay
//!
//! A TCP chat relay: every line a client sends is rebroadcast, timestamped
//! and labelled, to every other connected client.

pub mod broadcast;
pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod logging;
pub mod peer;
pub mod protocol;
pub mod server;

pub use server::Server;
