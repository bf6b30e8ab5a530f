//! Module `input`
//!
//! Classifies lines typed by the user before anything reaches the server.

/// Local command that ends the client; never sent as chat text.
pub const EXIT_COMMAND: &str = "exit";

/// What a line of user input means to the client.
#[derive(Debug, PartialEq, Eq)]
pub enum ClientInput {
    /// `exit`, matched exactly and case-sensitively.
    Exit,
    /// Nothing to send.
    Empty,
    /// Chat text to forward to the server.
    Send(String),
}

/// Parses one line of user input, ignoring its line terminator.
pub fn parse_input(raw: &str) -> ClientInput {
    let line = raw.trim_end_matches(['\r', '\n']);

    if line == EXIT_COMMAND {
        ClientInput::Exit
    } else if line.trim().is_empty() {
        ClientInput::Empty
    } else {
        ClientInput::Send(line.to_string())
    }
}
