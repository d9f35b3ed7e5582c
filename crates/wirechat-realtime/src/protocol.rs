//! JSON frame formats on the realtime wire.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Client-to-server frame.
///
/// Frames expecting an acknowledgement carry a correlation `id`; the
/// server echoes it back in [`ServerFrame::Ack`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientFrame {
    /// Correlation id for acknowledged emits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Event name.
    pub event: String,
    /// Event payload.
    pub data: Value,
}

/// Server-to-client frame: either an acknowledgement of a client emit or
/// a pushed event.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ServerFrame {
    /// Acknowledgement of the client frame with the matching id.
    Ack {
        /// The correlation id being acknowledged.
        ack: u64,
        /// Whether the remote operation succeeded.
        success: bool,
        /// Response payload on success.
        #[serde(default)]
        data: Option<Value>,
        /// Remote error message on failure.
        #[serde(default)]
        error: Option<String>,
    },
    /// Server-pushed event.
    Push {
        /// Event name.
        event: String,
        /// Event payload.
        #[serde(default)]
        data: Value,
    },
}
