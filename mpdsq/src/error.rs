//! Errors surfaced by the query client.
//!
//! Every failure is returned to the caller immediately. Nothing is retried and
//! no partial result is suppressed: a failed page ends the stream it belongs to.

use std::fmt;

use crate::config::ConfigError;
use crate::transport::TransportError;

/// Errors that can occur while building or running a query.
#[derive(Debug)]
pub enum QueryError {
    /// The client configuration is incomplete or invalid.
    Configuration(ConfigError),
    /// The query document is not a mapping of filter names to strings or integers.
    InvalidQuery(String),
    /// The server answered with a non-success status.
    RequestFailure { status: u16, message: String },
    /// A response body is missing a field the client depends on.
    ResponseFormat(String),
    /// The format selector is neither `json` nor `cif`.
    UnsupportedFormat(String),
    /// The request never produced a response.
    Transport(TransportError),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(e) => write!(f, "configuration error: {e}"),
            Self::InvalidQuery(reason) => write!(f, "invalid query: {reason}"),
            Self::RequestFailure { status, message } => {
                write!(f, "request failed with status {status}: {message}")
            }
            Self::ResponseFormat(reason) => write!(f, "unexpected response: {reason}"),
            Self::UnsupportedFormat(selector) => write!(f, "unknown format '{selector}'"),
            Self::Transport(e) => write!(f, "transport error: {e}"),
        }
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Configuration(e) => Some(e),
            Self::Transport(e) => Some(e),
            Self::InvalidQuery(_)
            | Self::RequestFailure { .. }
            | Self::ResponseFormat(_)
            | Self::UnsupportedFormat(_) => None,
        }
    }
}

impl From<ConfigError> for QueryError {
    fn from(e: ConfigError) -> Self {
        Self::Configuration(e)
    }
}

impl From<TransportError> for QueryError {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}
