use log::{error, info, warn};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;

use crate::config::ServerConfig;
use crate::connection::{ConnectionRegistry, handle_client};
use crate::error::ServerError;
use crate::peer::PeerId;

/// Pause after a failed accept so resource exhaustion does not spin the loop.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(50);

/// The accept loop: owns the listener, the shared registry and the set of
/// spawned connection handlers.
pub struct Server {
    listener: TcpListener,
    registry: Arc<ConnectionRegistry>,
    config: Arc<ServerConfig>,
    handlers: JoinSet<()>,
    next_peer_id: u64,
}

impl Server {
    /// Binds the configured address. Failing to bind is a startup error.
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let socket = config.listen_socket();
        let listener = TcpListener::bind(&socket)
            .await
            .map_err(|e| ServerError::Bind(socket.clone(), e))?;

        info!("Server bound to {}", listener.local_addr()?);

        Ok(Self {
            listener,
            registry: Arc::new(ConnectionRegistry::new()),
            config: Arc::new(config),
            handlers: JoinSet::new(),
            next_peer_id: 1,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Returns a handle to the registry of connected peers.
    pub fn registry(&self) -> Arc<ConnectionRegistry> {
        Arc::clone(&self.registry)
    }

    /// Accepts connections until the process exits.
    pub async fn start(self) {
        self.run_until(std::future::pending()).await
    }

    /// Accepts connections until `shutdown` completes, then aborts every
    /// handler that is still running.
    pub async fn run_until<F>(mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        info!(
            "Server started on {}...",
            self.local_addr()
                .map(|addr| addr.to_string())
                .unwrap_or_else(|_| self.config.listen_socket())
        );

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, addr)) => self.spawn_handler(stream, addr),
                    Err(e) => {
                        error!("Server accept failed: {}", e);
                        tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                    }
                },
                Some(finished) = self.handlers.join_next(), if !self.handlers.is_empty() => {
                    if let Err(e) = finished {
                        error!("Connection handler terminated abnormally: {}", e);
                    }
                }
            }
        }

        let remaining = self.handlers.len();
        self.handlers.shutdown().await;
        info!("Server stopped ({} connections aborted)", remaining);
    }

    // Spawn a task for each client so the accept loop doesn't block
    fn spawn_handler(&mut self, stream: TcpStream, addr: SocketAddr) {
        let id = PeerId::new(self.next_peer_id);
        self.next_peer_id += 1;

        let registry = Arc::clone(&self.registry);
        let config = Arc::clone(&self.config);

        info!("New connection from {} as {}", addr, id);
        self.handlers.spawn(async move {
            match handle_client(stream, id, addr, registry, config).await {
                Ok(reason) => info!("{} ({}) finished: {}", id, addr, reason),
                Err(e) => warn!("Failed to handle client {}: {}", addr, e),
            }
        });
    }
}
