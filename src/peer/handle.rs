//! Module `handle`
//!
//! Defines the `Peer` handle shared between the registry, the broadcast
//! engine and the owning connection handler.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

use crate::peer::PeerId;

/// Write side of a peer's byte stream.
pub type PeerWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Handle to one connected client.
///
/// Cloning is cheap; every clone refers to the same underlying writer. The
/// writer lock serializes concurrent deliveries so the bytes of two messages
/// never interleave on the wire.
#[derive(Clone)]
pub struct Peer {
    id: PeerId,
    addr: SocketAddr,
    writer: Arc<Mutex<PeerWriter>>,
    closed: Arc<AtomicBool>,
}

impl Peer {
    pub fn new<W>(id: PeerId, addr: SocketAddr, writer: W) -> Self
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self {
            id,
            addr,
            writer: Arc::new(Mutex::new(Box::new(writer))),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    // --------------------
    // Identity
    // --------------------

    pub fn id(&self) -> PeerId {
        self.id
    }

    /// Returns the remote socket address of the client.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn label(&self) -> String {
        self.id.label()
    }

    // --------------------
    // Resource
    // --------------------

    /// Returns whether the underlying stream has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Writes one complete payload to the peer and flushes it.
    pub async fn send(&self, payload: &[u8]) -> io::Result<()> {
        let mut writer = self.writer.lock().await;
        if self.is_closed() {
            return Err(io::Error::new(
                io::ErrorKind::NotConnected,
                format!("{} is closed", self.id),
            ));
        }
        writer.write_all(payload).await?;
        writer.flush().await
    }

    /// Shuts down the write side. Closing twice is a no-op.
    pub async fn close(&self) -> io::Result<()> {
        let mut writer = self.writer.lock().await;
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        writer.shutdown().await
    }
}

impl std::fmt::Debug for Peer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Peer")
            .field("id", &self.id)
            .field("addr", &self.addr)
            .field("closed", &self.is_closed())
            .finish()
    }
}
