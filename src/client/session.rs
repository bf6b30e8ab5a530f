//! Client session
//!
//! Forwards user input to the server and prints whatever the server sends.

use log::{info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use crate::client::{ClientInput, parse_input};
use crate::config::ClientConfig;
use crate::error::ClientError;

const GREETING: &str =
    "Connected to server. You can start chatting! (Type exit to end the conversation.)\n";
const FAREWELL: &str = "Exiting chat...\n";
const SERVER_CLOSED: &str = "Server closed the connection.\n";

/// How a client session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user typed `exit`.
    Exit,
    /// Standard input reached end-of-file.
    InputClosed,
    /// The server closed the connection.
    ServerClosed,
}

/// Connects to the configured server and runs an interactive session on
/// stdin/stdout.
pub async fn run(config: &ClientConfig) -> Result<SessionEnd, ClientError> {
    let addr = config.server_socket();
    let stream = TcpStream::connect(&addr)
        .await
        .map_err(|e| ClientError::Connect(addr.clone(), e))?;
    info!("Connected to {}", addr);

    let input = BufReader::new(tokio::io::stdin());
    let mut output = tokio::io::stdout();
    run_session(stream, input, &mut output).await
}

/// Runs a session over an established connection.
///
/// Server lines are copied to `output` as they arrive; input lines are sent
/// to the server one per line, except `exit`, which ends the session locally.
pub async fn run_session<I, O>(
    stream: TcpStream,
    input: I,
    output: &mut O,
) -> Result<SessionEnd, ClientError>
where
    I: AsyncBufRead + Unpin,
    O: AsyncWrite + Unpin,
{
    let (read_half, mut write_half) = stream.into_split();
    let mut server_lines = BufReader::new(read_half).lines();
    let mut input_lines = input.lines();

    write_out(output, GREETING).await?;

    let end = loop {
        tokio::select! {
            line = server_lines.next_line() => match line? {
                Some(line) => write_out(output, &format!("{}\n", line)).await?,
                None => {
                    write_out(output, SERVER_CLOSED).await?;
                    break SessionEnd::ServerClosed;
                }
            },
            line = input_lines.next_line() => match line? {
                Some(line) => match parse_input(&line) {
                    ClientInput::Exit => {
                        write_out(output, FAREWELL).await?;
                        break SessionEnd::Exit;
                    }
                    ClientInput::Empty => continue,
                    ClientInput::Send(text) => {
                        write_half.write_all(format!("{}\n", text).as_bytes()).await?;
                    }
                },
                None => break SessionEnd::InputClosed,
            },
        }
    };

    if let Err(e) = write_half.shutdown().await {
        warn!("Failed to shut down connection cleanly: {}", e);
    }
    Ok(end)
}

async fn write_out<O>(output: &mut O, text: &str) -> std::io::Result<()>
where
    O: AsyncWrite + Unpin,
{
    output.write_all(text.as_bytes()).await?;
    output.flush().await
}
