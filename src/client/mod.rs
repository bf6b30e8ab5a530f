//! Chat client
//!
//! Thin consumer of the relay protocol: stdin lines go to the server, server
//! lines go to stdout.

pub mod input;
pub mod session;

pub use input::{ClientInput, EXIT_COMMAND, parse_input};
pub use session::{SessionEnd, run, run_session};
