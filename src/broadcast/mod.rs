//! Broadcast engine
//!
//! Fans a message out to every connected peer except its sender.

pub mod engine;
pub mod results;

pub use engine::broadcast;
pub use results::BroadcastReport;
