//! Logging setup
//!
//! Both binaries log through the `log` facade with `env_logger`; `RUST_LOG`
//! overrides the default filter.

use env_logger::Env;

/// Default filter for the server: every connect, message and disconnect.
pub const SERVER_LOG_FILTER: &str = "info";

/// Default filter for the client, kept quiet so chat output stays readable.
pub const CLIENT_LOG_FILTER: &str = "warn";

/// Initializes the global logger. Calling it more than once is harmless.
pub fn init_logging(default_filter: &str) {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp_secs()
        .try_init();
}
