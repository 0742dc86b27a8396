use thiserror::Error;

/// Errors that can occur when requesting a streamed chat completion.
#[derive(Error, Debug)]
pub enum Error {
    /// Connection, TLS, timeout or body read failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Read failure on a non-HTTP byte source, such as a captured stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The endpoint answered with a non-success status.
    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Streaming error: {0}")]
    Streaming(String),
}

impl Error {
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Error::Status {
            status,
            body: body.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Error::InvalidRequest(message.into())
    }

    pub fn streaming(message: impl Into<String>) -> Self {
        Error::Streaming(message.into())
    }

    /// Raw response body for protocol errors, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Error::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}
