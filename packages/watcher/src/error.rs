//! Error types for the watcher.

use thiserror::Error;

/// Watcher-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// `--url` could not be turned into HTTP / WebSocket endpoints
    #[error("Invalid server URL '{0}'")]
    InvalidUrl(String),

    /// WebSocket handshake failed
    #[error("Connection error: {0}")]
    Connection(String),

    /// Fetching `GET /api/whiteboard/{pass}` failed
    #[error("Failed to fetch snapshot: {0}")]
    Snapshot(String),

    /// The subscription dropped after it had been established
    #[error("Connection lost")]
    ConnectionLost,

    #[error("Failed to reconnect after {0} attempts")]
    ReconnectExhausted(u32),
}
