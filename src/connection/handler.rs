use log::{debug, error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::net::TcpStream;

use crate::broadcast::broadcast;
use crate::config::ServerConfig;
use crate::connection::{CloseReason, ConnectionRegistry, ConnectionState};
use crate::error::RegistryError;
use crate::peer::{Peer, PeerId};
use crate::protocol::{LineFramer, Message};

/// Handles one accepted TCP connection until it ends.
pub async fn handle_client(
    stream: TcpStream,
    id: PeerId,
    addr: SocketAddr,
    registry: Arc<ConnectionRegistry>,
    config: Arc<ServerConfig>,
) -> Result<CloseReason, RegistryError> {
    let (read_half, write_half) = stream.into_split();
    handle_connection(read_half, write_half, id, addr, registry, config).await
}

/// Drives the lifecycle of one connection.
///
/// - Registers the peer and announces it to everyone else.
/// - Frames inbound bytes into lines and broadcasts each one, sender excluded.
/// - On end-of-stream, read error or framing error: deregisters, closes the
///   stream and announces the departure. This happens exactly once.
///
/// Only a duplicate registration is reported as an error; every way a
/// connection can end is returned as a `CloseReason`.
pub async fn handle_connection<R, W>(
    mut reader: R,
    writer: W,
    id: PeerId,
    addr: SocketAddr,
    registry: Arc<ConnectionRegistry>,
    config: Arc<ServerConfig>,
) -> Result<CloseReason, RegistryError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Send + Unpin + 'static,
{
    let peer = Peer::new(id, addr, writer);
    let mut lifecycle = Lifecycle::new(id);

    if let Err(e) = registry.add(peer.clone()).await {
        error!("Could not register {} ({}): {}", id, addr, e);
        lifecycle.advance(ConnectionState::Closing);
        if let Err(e) = peer.close().await {
            debug!("Closing {} ({}) failed: {}", id, addr, e);
        }
        lifecycle.advance(ConnectionState::Closed);
        return Err(e);
    }
    lifecycle.advance(ConnectionState::Registered);

    let joined = Message::connected(id);
    log_message(&joined);
    broadcast(&registry, &joined, id).await;

    lifecycle.advance(ConnectionState::Receiving);
    let reason = receive_loop(&mut reader, &registry, id, &config).await;

    lifecycle.advance(ConnectionState::Closing);
    registry.remove(id).await;
    if let Err(e) = peer.close().await {
        debug!("Closing {} ({}) failed: {}", id, addr, e);
    }

    // The departing peer is no longer registered, so excluding it is inert.
    let left = Message::disconnected(id);
    log_message(&left);
    broadcast(&registry, &left, id).await;
    lifecycle.advance(ConnectionState::Closed);

    Ok(reason)
}

async fn receive_loop<R>(
    reader: &mut R,
    registry: &ConnectionRegistry,
    id: PeerId,
    config: &ServerConfig,
) -> CloseReason
where
    R: AsyncRead + Unpin,
{
    let mut framer = LineFramer::new(config.max_line_length);
    let mut buffer = vec![0u8; config.read_buffer_size];

    loop {
        let n = match reader.read(&mut buffer).await {
            Ok(0) => {
                if let Some(line) = framer.finish() {
                    relay_line(registry, id, line).await;
                }
                return CloseReason::PeerClosed;
            }
            Ok(n) => n,
            Err(e) => {
                warn!("Failed to read from {}: {}", id, e);
                return CloseReason::ReadFailed(e.to_string());
            }
        };

        framer.extend(&buffer[..n]);
        loop {
            match framer.next_line() {
                Ok(Some(line)) => relay_line(registry, id, line).await,
                Ok(None) => break,
                Err(e) => {
                    warn!("Dropping {}: {}", id, e);
                    return CloseReason::FramingFailed(e.to_string());
                }
            }
        }
    }
}

async fn relay_line(registry: &ConnectionRegistry, id: PeerId, line: String) {
    let message = Message::chat(id, line);
    log_message(&message);
    broadcast(registry, &message, id).await;
}

/// Writes the console line for a message, header and body on one line.
fn log_message(message: &Message) {
    info!("{}", message.render().trim_end().replace('\n', " "));
}

/// Tracks and logs the state of one handler.
struct Lifecycle {
    id: PeerId,
    state: ConnectionState,
}

impl Lifecycle {
    fn new(id: PeerId) -> Self {
        Self {
            id,
            state: ConnectionState::Connecting,
        }
    }

    fn advance(&mut self, next: ConnectionState) {
        if !self.state.can_transition_to(next) {
            error!("{}: illegal transition {} -> {}", self.id, self.state, next);
        }
        debug!("{}: {} -> {}", self.id, self.state, next);
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, ReadBuf};
    use tokio::task::JoinHandle;

    /// Reader standing in for a connection reset by the remote side.
    struct ResetReader;

    impl AsyncRead for ResetReader {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            Poll::Ready(Err(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            )))
        }
    }

    fn test_config() -> Arc<ServerConfig> {
        Arc::new(ServerConfig {
            max_line_length: 16,
            ..ServerConfig::default()
        })
    }

    fn test_addr() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    /// In-memory client: the handler's task, the client's write end and a
    /// reader for what the server sends back.
    struct TestClient {
        task: JoinHandle<Result<CloseReason, RegistryError>>,
        input: DuplexStream,
        output: BufReader<DuplexStream>,
    }

    fn connect(registry: &Arc<ConnectionRegistry>, raw: u64) -> TestClient {
        let (input, server_reader) = tokio::io::duplex(1024);
        let (server_writer, output) = tokio::io::duplex(1024);
        let task = tokio::spawn(handle_connection(
            server_reader,
            server_writer,
            PeerId::new(raw),
            test_addr(),
            Arc::clone(registry),
            test_config(),
        ));
        TestClient {
            task,
            input,
            output: BufReader::new(output),
        }
    }

    async fn wait_for_len(registry: &ConnectionRegistry, len: usize) {
        while registry.len().await != len {
            tokio::task::yield_now().await;
        }
    }

    async fn read_body(reader: &mut BufReader<DuplexStream>) -> String {
        let mut header = String::new();
        reader.read_line(&mut header).await.unwrap();
        let mut body = String::new();
        reader.read_line(&mut body).await.unwrap();
        body
    }

    #[tokio::test]
    async fn test_lifecycle_broadcasts() {
        let registry = Arc::new(ConnectionRegistry::new());
        let mut a = connect(&registry, 1);
        wait_for_len(&registry, 1).await;
        let mut b = connect(&registry, 2);

        assert_eq!(read_body(&mut a.output).await, "Server: Client2 is connected.\n");

        b.input.write_all(b"hello\n").await.unwrap();
        assert_eq!(read_body(&mut a.output).await, "Client2: hello\n");

        drop(b.input);
        assert_eq!(b.task.await.unwrap(), Ok(CloseReason::PeerClosed));
        assert_eq!(read_body(&mut a.output).await, "Server: Client2 is disconnected.\n");
        assert!(!registry.contains(PeerId::new(2)).await);

        // B's stream never carried its own messages.
        let mut rest = String::new();
        b.output.read_to_string(&mut rest).await.unwrap();
        assert!(rest.is_empty());

        drop(a.input);
        a.task.await.unwrap().unwrap();
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_oversized_line_closes_connection() {
        let registry = Arc::new(ConnectionRegistry::new());
        let mut a = connect(&registry, 1);
        wait_for_len(&registry, 1).await;

        a.input
            .write_all(b"this line is far too long\n")
            .await
            .unwrap();

        let reason = a.task.await.unwrap().unwrap();
        assert!(matches!(reason, CloseReason::FramingFailed(_)));
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_read_error_deregisters_once() {
        let registry = Arc::new(ConnectionRegistry::new());
        let mut a = connect(&registry, 1);
        wait_for_len(&registry, 1).await;

        let (server_writer, _output) = tokio::io::duplex(1024);
        let reason = handle_connection(
            ResetReader,
            server_writer,
            PeerId::new(2),
            test_addr(),
            Arc::clone(&registry),
            test_config(),
        )
        .await
        .unwrap();

        assert!(matches!(reason, CloseReason::ReadFailed(_)));
        assert!(!registry.contains(PeerId::new(2)).await);
        assert_eq!(read_body(&mut a.output).await, "Server: Client2 is connected.\n");
        assert_eq!(read_body(&mut a.output).await, "Server: Client2 is disconnected.\n");

        // Nothing else was announced for Client2.
        drop(a.input);
        a.task.await.unwrap().unwrap();
        let mut rest = String::new();
        a.output.read_to_string(&mut rest).await.unwrap();
        assert!(rest.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_registration_is_rejected() {
        let registry = Arc::new(ConnectionRegistry::new());
        let (writer, _reader) = tokio::io::duplex(16);
        registry
            .add(Peer::new(PeerId::new(1), test_addr(), writer))
            .await
            .unwrap();

        let client = connect(&registry, 1);
        let result = client.task.await.unwrap();

        assert_eq!(result, Err(RegistryError::DuplicatePeer(PeerId::new(1))));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_unterminated_tail_is_delivered() {
        let registry = Arc::new(ConnectionRegistry::new());
        let mut a = connect(&registry, 1);
        wait_for_len(&registry, 1).await;
        let mut b = connect(&registry, 2);
        read_body(&mut a.output).await;

        b.input.write_all(b"no newline").await.unwrap();
        drop(b.input);

        assert_eq!(read_body(&mut a.output).await, "Client2: no newline\n");
        assert_eq!(read_body(&mut a.output).await, "Server: Client2 is disconnected.\n");
        b.task.await.unwrap().unwrap();
    }
}
