//! Fan-out frame envelope.
//!
//! Every frame a subscriber receives is an [`EventEnvelope`]; its `data`
//! field holds a payload from [`crate::domain::event`] depending on `event`.

use serde::{Deserialize, Serialize};

/// `{"channel": "...", "event": "...", "data": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub channel: String,
    pub event: String,
    pub data: serde_json::Value,
}
