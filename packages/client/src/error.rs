//! Error types for the fact-check client.
//!
//! `ClientError` is what the `try_*` operations return. The public
//! `fetch_*` operations never surface it; they log it and hand the caller
//! `None` instead.

use thiserror::Error;

use crate::schema::ValidationError;

/// Main error type for the fact-check client library.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The statement was empty or whitespace only.
    #[error("Statement cannot be empty")]
    EmptyStatement,

    /// Required configuration is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error, e.g. reading a prompt template.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Connection, DNS, timeout or body read failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Server returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not valid JSON.
    #[error("Response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response body was JSON but violated the result schema.
    #[error("Response failed validation: {0}")]
    Validation(#[from] ValidationError),

    /// The generative model answered without any candidate text.
    #[error("Model returned an empty completion")]
    EmptyCompletion,

    /// Every attempt allowed by the retry policy failed. `last` is the
    /// failure of the final attempt.
    #[error("Gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        last: Box<ClientError>,
    },
}

impl ClientError {
    /// True when a response arrived but its content could not be trusted.
    ///
    /// Used to tell "backend unreachable" apart from "backend returned
    /// garbage" in the logs.
    ///
    /// After exhausted retries this reflects the final attempt.
    pub fn is_validation(&self) -> bool {
        match self {
            ClientError::Decode(_) | ClientError::Validation(_) | ClientError::EmptyCompletion => {
                true
            }
            ClientError::RetriesExhausted { last, .. } => last.is_validation(),
            _ => false,
        }
    }

    /// True for connection-level failures and non-success statuses.
    pub fn is_transport(&self) -> bool {
        match self {
            ClientError::Http(_) | ClientError::Status { .. } => true,
            ClientError::RetriesExhausted { last, .. } => last.is_transport(),
            _ => false,
        }
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
