//! Realtime WebSocket client configuration.

use serde::{Deserialize, Serialize};

/// Realtime connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// WebSocket endpoint of the backend.
    #[serde(default = "default_url")]
    pub url: String,
    /// Transport-level connect timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Initial reconnection delay in milliseconds.
    #[serde(default = "default_base_delay")]
    pub reconnect_base_delay_ms: u64,
    /// Upper bound on the reconnection delay in milliseconds.
    #[serde(default = "default_max_delay")]
    pub reconnect_max_delay_ms: u64,
    /// Number of consecutive failed attempts after which the manager
    /// settles in the error state and stops retrying.
    #[serde(default = "default_max_attempts")]
    pub max_reconnect_attempts: u32,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            connect_timeout_seconds: default_connect_timeout(),
            reconnect_base_delay_ms: default_base_delay(),
            reconnect_max_delay_ms: default_max_delay(),
            max_reconnect_attempts: default_max_attempts(),
        }
    }
}

fn default_url() -> String {
    "ws://localhost:8080/ws".to_string()
}

fn default_connect_timeout() -> u64 {
    20
}

fn default_base_delay() -> u64 {
    1000
}

fn default_max_delay() -> u64 {
    10_000
}

fn default_max_attempts() -> u32 {
    10
}
