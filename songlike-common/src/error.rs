//! Startup errors shared across the workspace

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading configuration or wiring the service
#[derive(Error, Debug)]
pub enum Error {
    /// Unreadable, malformed or out-of-range configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// An outbound API client could not be constructed
    #[error("Client setup failed: {0}")]
    ClientSetup(String),
}
