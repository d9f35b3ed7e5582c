//! Unverified JWT payload inspection.
//!
//! The client never verifies signatures — the backend independently
//! re-verifies every credential. Decoding here only protects the user
//! experience by catching obviously-dead tokens before a request is made,
//! so an undecodable token is simply treated as expired.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use serde::Deserialize;

/// Claims the client cares about inside an access or refresh token.
#[derive(Debug, Clone, Deserialize)]
pub struct RawClaims {
    /// Subject — the user ID.
    pub sub: Option<String>,
    /// Email address, if present.
    pub email: Option<String>,
    /// Token type: `"access"` or `"refresh"`.
    #[serde(rename = "type")]
    pub token_type: Option<String>,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: Option<i64>,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Decode a JWT payload without signature verification.
///
/// Returns `None` for anything that is not a three-part token with a
/// base64url JSON payload.
pub fn decode_unverified(token: &str) -> Option<RawClaims> {
    let mut parts = token.split('.');
    let _header = parts.next()?;
    let payload = parts.next()?;
    let _signature = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Whether the token's encoded expiry is at or before now + `leeway`.
///
/// Decoding failure counts as expired.
pub fn is_expired(token: &str, leeway: Duration) -> bool {
    match decode_unverified(token) {
        Some(claims) => claims.exp <= (Utc::now() + leeway).timestamp(),
        None => true,
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// Build an unsigned test token with the given expiry offset from now.
    pub fn make_token(expires_in_seconds: i64) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = serde_json::json!({
            "sub": "550e8400-e29b-41d4-a716-446655440000",
            "email": "user@example.com",
            "type": "access",
            "iat": Utc::now().timestamp(),
            "exp": Utc::now().timestamp() + expires_in_seconds,
        });
        let payload = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
        format!("{header}.{payload}.sig")
    }
}
