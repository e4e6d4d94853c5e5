//! Error types for rendering and view operations

use std::fmt;

/// Errors that can occur while turning org source into markup
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Error while turning the render tree into a markup string
    SerializationError(String),
    /// A stage panicked; caught at the pipeline boundary
    Internal(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            RenderError::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for RenderError {}

/// Errors raised by the view session when talking to its host
#[derive(Debug, Clone, PartialEq)]
pub enum ViewError {
    /// An inbound message could not be decoded
    Protocol(String),
    /// An outbound message could not be delivered
    Channel(String),
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewError::Protocol(msg) => write!(f, "Protocol error: {msg}"),
            ViewError::Channel(msg) => write!(f, "Channel error: {msg}"),
        }
    }
}

impl std::error::Error for ViewError {}

impl From<serde_json::Error> for ViewError {
    fn from(err: serde_json::Error) -> Self {
        ViewError::Protocol(err.to_string())
    }
}
