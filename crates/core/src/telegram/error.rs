//! Error types for the Telegram transport.

use thiserror::Error;

/// Errors that can occur while talking to the Bot API.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request timed out.
    #[error("telegram request timed out")]
    Timeout,

    /// Could not reach the API host.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The API answered with `ok: false` or an error status.
    #[error("telegram api error: {description}")]
    Api { description: String },

    /// The API answered with a body we could not interpret.
    #[error("unexpected response: {0}")]
    InvalidResponse(String),

    /// I/O error while writing a downloaded file.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// Creates an API error from a description.
    pub fn api(description: impl Into<String>) -> Self {
        Self::Api {
            description: description.into(),
        }
    }
}
