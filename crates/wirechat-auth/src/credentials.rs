//! The access/refresh credential pair and the refresh grant wire format.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// The active credential pair for a session.
///
/// At most one valid pair exists per session; the pair is always replaced
/// as a whole, never one token at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
    /// Short-lived bearer credential for API calls.
    pub access_token: String,
    /// Longer-lived credential used only to obtain a new access token.
    pub refresh_token: String,
    /// When the access token expires.
    pub expires_at: DateTime<Utc>,
}

impl CredentialPair {
    /// Whether the access token is expired or will expire within `leeway`.
    pub fn is_stale(&self, leeway: Duration) -> bool {
        self.expires_at <= Utc::now() + leeway
    }
}

/// Token grant returned by the login, register, and refresh endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenGrant {
    /// The new access token.
    pub access_token: String,
    /// The new refresh token.
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    /// Token scheme, always `"Bearer"`.
    pub token_type: String,
}

impl TokenGrant {
    /// Convert the grant into a stored credential pair, anchoring the
    /// expiry at the current instant.
    pub fn into_pair(self) -> CredentialPair {
        CredentialPair {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at: Utc::now() + Duration::seconds(self.expires_in),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_pair_is_not_stale() {
        let pair = CredentialPair {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            expires_at: Utc::now() + Duration::minutes(15),
        };
        assert!(!pair.is_stale(Duration::seconds(30)));
    }

    #[test]
    fn test_pair_expiring_within_leeway_is_stale() {
        let pair = CredentialPair {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            expires_at: Utc::now() + Duration::seconds(10),
        };
        assert!(pair.is_stale(Duration::seconds(30)));
    }

    #[test]
    fn test_grant_into_pair_anchors_expiry() {
        let grant = TokenGrant {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            expires_in: 900,
            token_type: "Bearer".to_string(),
        };
        let pair = grant.into_pair();
        let remaining = pair.expires_at - Utc::now();
        assert!(remaining > Duration::seconds(890));
        assert!(remaining <= Duration::seconds(900));
    }
}
