//! Configuration management for the RAX chat relay
//!
//! Separates the server's listening configuration from the client's
//! connection configuration. Both are read from an optional `config.toml`
//! with environment overrides on top of built-in defaults.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Config file looked up next to the working directory (extension optional)
pub const DEFAULT_CONFIG_PATH: &str = "config";

/// Environment variable prefix, e.g. `RAX_CHAT_SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "RAX_CHAT";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1";
const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Complete configuration for both binaries
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub client: ClientConfig,
}

/// Configuration of the listening server
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Interface to bind; `0.0.0.0` accepts on every interface
    pub bind_address: String,

    /// Listening port; 0 lets the OS pick one
    pub port: u16,

    /// Size of the per-connection receive buffer
    pub read_buffer_size: usize,

    /// Longest accepted line in bytes, line terminator excluded
    pub max_line_length: usize,
}

/// Configuration of the interactive client
#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    pub server_address: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            read_buffer_size: DEFAULT_BUFFER_SIZE,
            max_line_length: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_address: DEFAULT_SERVER_ADDRESS.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Settings {
    /// Load configuration from `config.toml` (if present) with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from the given file (if present) with environment overrides
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let server = ServerConfig::default();
        let client = ClientConfig::default();

        let settings = Config::builder()
            .set_default("server.bind_address", server.bind_address)?
            .set_default("server.port", i64::from(server.port))?
            .set_default("server.read_buffer_size", server.read_buffer_size as i64)?
            .set_default("server.max_line_length", server.max_line_length as i64)?
            .set_default("client.server_address", client.server_address)?
            .set_default("client.port", i64::from(client.port))?
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Settings = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.bind_address.trim().is_empty() {
            return Err(ConfigError::Message(
                "server.bind_address cannot be empty".into(),
            ));
        }

        if self.server.read_buffer_size == 0 {
            return Err(ConfigError::Message(
                "server.read_buffer_size must be greater than 0".into(),
            ));
        }

        if self.server.max_line_length == 0 {
            return Err(ConfigError::Message(
                "server.max_line_length must be greater than 0".into(),
            ));
        }

        if self.client.server_address.trim().is_empty() {
            return Err(ConfigError::Message(
                "client.server_address cannot be empty".into(),
            ));
        }

        if self.client.port == 0 {
            return Err(ConfigError::Message("client.port cannot be 0".into()));
        }

        Ok(())
    }
}

impl ServerConfig {
    /// Get bind address and port as a socket address string
    pub fn listen_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

impl ClientConfig {
    /// Get server address and port as a socket address string
    pub fn server_socket(&self) -> String {
        format!("{}:{}", self.server_address, self.port)
    }
}
