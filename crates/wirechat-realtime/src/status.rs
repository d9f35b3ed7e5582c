//! Connection status machine.

use serde::{Deserialize, Serialize};

/// Lifecycle state of the realtime connection.
///
/// `disconnected -> connecting -> connected`, with `connecting` or
/// `connected` falling to `error` on failure and any state moving to
/// `disconnected` on explicit teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// No connection and none being attempted.
    Disconnected,
    /// A handshake is in flight.
    Connecting,
    /// The connection is live.
    Connected,
    /// The last attempt failed; reconnection may be in progress or given up.
    Error,
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}
