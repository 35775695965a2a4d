//! Error handling for the hostpulse telemetry crate.

use std::time::Duration;

/// A specialized `Result` type for hostpulse operations.
pub type Result<T> = std::result::Result<T, SystemError>;

/// The main error type for hostpulse operations.
#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Probe data could not be parsed
    #[error("Failed to parse system information: {0}")]
    ParseError(String),

    /// A pseudo-file read did not finish in time
    #[error("Read of {path} timed out after {timeout:?}")]
    Timeout { path: String, timeout: Duration },

    /// The operating system exposed nothing to collect from
    #[error("System information unavailable: {0}")]
    Unavailable(String),

    /// Web server error
    #[error("Web server error: {0}")]
    WebServer(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SystemError {
    /// Create a new parse error
    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a new timeout error for `path`
    pub fn timeout(path: impl Into<String>, timeout: Duration) -> Self {
        Self::Timeout {
            path: path.into(),
            timeout,
        }
    }

    /// Create a new unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create a new web server error
    pub fn web_server_error(msg: impl Into<String>) -> Self {
        Self::WebServer(msg.into())
    }

    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
