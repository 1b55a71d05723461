//! Error types for catalog list loading.
//!
//! Every asynchronous operation resolves to an explicit `Result` carrying one
//! of these variants. Errors are `Clone` so that one in-flight request can hand
//! the same outcome to every caller that joined it.

use std::fmt;
use thiserror::Error;

use crate::types::Resource;

/// The unified error type for edulist operations.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The request never reached the server (offline, DNS, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The server answered with a non-2xx status.
    #[error("server error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The response body did not have the expected shape.
    #[error("malformed response: {0}")]
    Malformed(#[from] MalformedResponseError),

    /// A single-item lookup found no match.
    #[error("not found: {0}")]
    NotFound(#[from] NotFoundError),

    /// Input validation errors (bad URL, out-of-sequence page, bad config).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// Message suitable for showing next to a retry button.
    ///
    /// Server-provided messages are preferred; malformed responses are shown
    /// the same way as server errors.
    pub fn user_message(&self) -> String {
        match self {
            Error::Transport(TransportError::Timeout { .. }) => {
                "The request timed out. Check your connection and try again.".to_string()
            }
            Error::Transport(_) => {
                "Unable to reach the server. Check your connection and try again.".to_string()
            }
            Error::Protocol(err) => err
                .message
                .clone()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "An unexpected error occurred".to_string()),
            Error::Malformed(_) => "An unexpected error occurred".to_string(),
            Error::NotFound(err) => format!("{} not found", err.resource.label()),
            Error::InvalidInput(err) => err.to_string(),
        }
    }

    /// Returns true if re-issuing the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Transport(_) | Error::Protocol(_) | Error::Malformed(_)
        )
    }

    /// Returns true for the "no match" outcome of a single-item lookup.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

/// Transport-level errors.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Local I/O failed (file backend).
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// A non-2xx response from a catalog endpoint.
#[derive(Debug, Clone)]
pub struct ProtocolError {
    /// HTTP status code.
    pub status: u16,
    /// Error message from the server, if it sent one.
    pub message: Option<String>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(status: u16, message: Option<String>) -> Self {
        Self { status, message }
    }
}

/// The body of a successful response could not be decoded.
#[derive(Debug, Clone, Error)]
#[error("{endpoint}: {reason}")]
pub struct MalformedResponseError {
    /// Endpoint path the body came from.
    pub endpoint: String,
    /// Decoder message.
    pub reason: String,
}

impl MalformedResponseError {
    pub fn new(endpoint: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }
}

/// No item matched a single-item lookup.
#[derive(Debug, Clone, Error)]
#[error("no {} with slug '{slug}'", .resource.singular())]
pub struct NotFoundError {
    pub resource: Resource,
    pub slug: String,
}

/// Input validation errors.
#[derive(Debug, Clone, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// A page arrived that does not continue the accumulated list.
    #[error("page {actual} cannot follow page {expected_after}")]
    PageOrder { expected_after: u32, actual: u32 },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}
