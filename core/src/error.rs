//! Error types for the todo sync core.
//!
//! # Design
//! The three failure families (transport, application, validation) keep
//! distinct variants for logging, but the controller collapses all of them
//! into a single human-readable message in `ListState::error`. None of these
//! ever escapes the controller.

use thiserror::Error;

/// The round trip itself could not complete (connection refused, I/O error,
/// executor shut down...).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("transport failed: {0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Errors produced while building requests or interpreting responses.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Client-side precondition: the todo text is empty or whitespace only.
    #[error("text must not be empty")]
    EmptyText,

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response envelope reported `success: false`.
    #[error("rejected by server: {}", .message.as_deref().unwrap_or("no message"))]
    Rejected { message: Option<String> },

    /// `success: true`, but the payload is not the expected shape.
    #[error("unexpected payload: {reason}")]
    UnexpectedPayload {
        reason: String,
        message: Option<String>,
    },

    /// The response body is not a valid envelope.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// The non-empty message the server attached to its response, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message } | ApiError::UnexpectedPayload { message, .. } => {
                message.as_deref().filter(|m| !m.is_empty())
            }
            _ => None,
        }
    }
}
