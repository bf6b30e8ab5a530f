//! RAX Chat Relay - Client Entry Point
//!
//! Sends lines typed on stdin to the server and prints what other clients say.

use log::info;

use rax_chat_relay::client::{self, SessionEnd};
use rax_chat_relay::config::Settings;
use rax_chat_relay::error::ClientError;
use rax_chat_relay::logging::{CLIENT_LOG_FILTER, init_logging};

#[tokio::main]
async fn main() {
    init_logging(CLIENT_LOG_FILTER);

    let code = match run().await {
        Ok(end) => {
            info!("Session ended: {:?}", end);
            0
        }
        Err(e) => {
            eprintln!("{}", e);
            1
        }
    };

    // A pending stdin read would otherwise keep the runtime alive.
    std::process::exit(code);
}

async fn run() -> Result<SessionEnd, ClientError> {
    let settings = Settings::load()?;
    client::run(&settings.client).await
}
