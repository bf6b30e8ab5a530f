//! Error types
//!
//! Defines domain-specific error types for each part of the chat relay.

use std::fmt;
use std::io;

use crate::peer::PeerId;

/// Connection registry errors
#[derive(Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// A handler tried to register a peer that is already present.
    DuplicatePeer(PeerId),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::DuplicatePeer(id) => write!(f, "Peer already registered: {}", id),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Line framing errors
#[derive(Debug, PartialEq, Eq)]
pub enum FramingError {
    LineTooLong { limit: usize, length: usize },
}

impl fmt::Display for FramingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FramingError::LineTooLong { limit, length } => {
                write!(f, "Line of {} bytes exceeds limit of {} bytes", length, limit)
            }
        }
    }
}

impl std::error::Error for FramingError {}

/// Server startup and accept loop errors
#[derive(Debug)]
pub enum ServerError {
    Bind(String, io::Error),
    Config(config::ConfigError),
    IoError(io::Error),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Bind(addr, e) => write!(f, "Failed to bind to {}: {}", addr, e),
            ServerError::Config(e) => write!(f, "Configuration error: {}", e),
            ServerError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<config::ConfigError> for ServerError {
    fn from(error: config::ConfigError) -> Self {
        ServerError::Config(error)
    }
}

impl From<io::Error> for ServerError {
    fn from(error: io::Error) -> Self {
        ServerError::IoError(error)
    }
}

/// Chat client errors
#[derive(Debug)]
pub enum ClientError {
    Connect(String, io::Error),
    Config(config::ConfigError),
    IoError(io::Error),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Connect(addr, e) => write!(f, "Connection to {} failed: {}", addr, e),
            ClientError::Config(e) => write!(f, "Configuration error: {}", e),
            ClientError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<config::ConfigError> for ClientError {
    fn from(error: config::ConfigError) -> Self {
        ClientError::Config(error)
    }
}

impl From<io::Error> for ClientError {
    fn from(error: io::Error) -> Self {
        ClientError::IoError(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = RegistryError::DuplicatePeer(PeerId::new(7));
        assert_eq!(err.to_string(), "Peer already registered: Client7");

        let err = FramingError::LineTooLong {
            limit: 4,
            length: 9,
        };
        assert_eq!(err.to_string(), "Line of 9 bytes exceeds limit of 4 bytes");

        let io_err = io::Error::new(io::ErrorKind::AddrInUse, "in use");
        let err = ServerError::Bind("0.0.0.0:8080".into(), io_err);
        assert!(err.to_string().starts_with("Failed to bind to 0.0.0.0:8080"));
    }

    #[test]
    fn test_config_errors_convert() {
        let err: ServerError = config::ConfigError::Message("bad port".into()).into();
        assert!(matches!(err, ServerError::Config(_)));
        assert_eq!(err.to_string(), "Configuration error: bad port");

        let err: ClientError = config::ConfigError::Message("bad port".into()).into();
        assert!(matches!(err, ClientError::Config(_)));
    }
}
