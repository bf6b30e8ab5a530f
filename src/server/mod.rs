//! Server core functionality
//!
//! This module contains the accept loop that spawns one connection handler
//! per client.

pub mod core;

pub use self::core::Server;
