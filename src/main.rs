//! RAX Chat Relay - Server Entry Point
//!
//! Accepts chat clients and relays each line to every other client.

use log::{error, info, warn};

use rax_chat_relay::Server;
use rax_chat_relay::config::Settings;
use rax_chat_relay::error::ServerError;
use rax_chat_relay::logging::{SERVER_LOG_FILTER, init_logging};

#[tokio::main]
async fn main() {
    init_logging(SERVER_LOG_FILTER);

    info!("Launching chat server...");

    if let Err(e) = run().await {
        error!("Server startup failed: {}", e);
        std::process::exit(1);
    }

    info!("Exited.");
}

async fn run() -> Result<(), ServerError> {
    let settings = Settings::load()?;
    let server = Server::bind(settings.server).await?;

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to install Ctrl-C handler: {}", e);
                std::future::pending::<()>().await;
            }
            info!("Ctrl-C received, shutting down");
        })
        .await;

    Ok(())
}
