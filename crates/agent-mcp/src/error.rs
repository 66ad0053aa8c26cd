//! Protocol Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, McpError>;

/// Tool protocol errors
#[derive(Error, Debug)]
pub enum McpError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed message: {0}")]
    Json(#[from] serde_json::Error),

    /// Peer closed the stream before answering
    #[error("Connection closed")]
    Closed,

    /// Error object returned by the peer
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Response that does not answer the pending request
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Failed to start tool server '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
}
