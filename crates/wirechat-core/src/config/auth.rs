//! Credential and refresh configuration.

use serde::{Deserialize, Serialize};

/// Credential lifecycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Safety margin in seconds: a token expiring within this window is
    /// treated as already stale.
    #[serde(default = "default_leeway")]
    pub refresh_leeway_seconds: u64,
    /// Cookie name carrying the access token.
    ///
    /// Deliberately not HTTP-only on the backend so the gateway and the
    /// realtime handshake can both read it.
    #[serde(default = "default_access_cookie")]
    pub access_cookie: String,
    /// Cookie name carrying the refresh token.
    #[serde(default = "default_refresh_cookie")]
    pub refresh_cookie: String,
    /// Lifetime of the refresh cookie in seconds.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            refresh_leeway_seconds: default_leeway(),
            access_cookie: default_access_cookie(),
            refresh_cookie: default_refresh_cookie(),
            refresh_ttl_seconds: default_refresh_ttl(),
        }
    }
}

fn default_leeway() -> u64 {
    30
}

fn default_access_cookie() -> String {
    "chat_accessToken".to_string()
}

fn default_refresh_cookie() -> String {
    "chat_refreshToken".to_string()
}

fn default_refresh_ttl() -> u64 {
    // 7 days
    7 * 24 * 60 * 60
}
