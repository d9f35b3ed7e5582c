//! The admission decision itself.

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, warn};

use wirechat_auth::claims;
use wirechat_auth::credentials::TokenGrant;
use wirechat_auth::refresher::TokenRefresher;
use wirechat_core::config::{AuthConfig, EdgeConfig};

use crate::paths::{PathClass, PathPolicy};

/// What the edge does with a navigation.
#[derive(Debug)]
pub enum Admission {
    /// Let the request through unmodified.
    Continue,
    /// Let the request through and rewrite both credential cookies on the
    /// outgoing response.
    Rotate(TokenGrant),
    /// Redirect to the login page, optionally remembering the requested
    /// path and optionally deleting the credential cookies.
    RedirectToLogin {
        /// The originally requested path, carried as a callback parameter.
        callback: Option<String>,
        /// Whether the stored credentials are dead and must be deleted.
        clear_cookies: bool,
    },
    /// Redirect an already-authenticated user away from an auth-only page.
    RedirectHome,
}

enum AccessState {
    Absent,
    Valid,
    Expired,
}

/// Decides admission for each navigation.
///
/// Never errors toward the caller: a failed refresh resolves to a redirect
/// or an unauthenticated continue.
pub struct AdmissionFilter {
    policy: PathPolicy,
    refresher: Arc<dyn TokenRefresher>,
    leeway: Duration,
}

impl std::fmt::Debug for AdmissionFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdmissionFilter")
            .field("leeway", &self.leeway)
            .finish_non_exhaustive()
    }
}

impl AdmissionFilter {
    /// Creates a filter with the configured path policy and leeway.
    pub fn new(
        edge: &EdgeConfig,
        auth: &AuthConfig,
        refresher: Arc<dyn TokenRefresher>,
    ) -> Self {
        Self {
            policy: PathPolicy::new(edge),
            refresher,
            leeway: Duration::seconds(auth.refresh_leeway_seconds as i64),
        }
    }

    /// Decides what to do with a navigation to `path` given the two
    /// credential cookie values.
    ///
    /// Expiry is judged from the token's encoded expiry without signature
    /// verification; an undecodable token counts as expired.
    pub async fn admit(
        &self,
        path: &str,
        access_token: Option<&str>,
        refresh_token: Option<&str>,
    ) -> Admission {
        let class = self.policy.classify(path);
        let access = match access_token {
            None => AccessState::Absent,
            Some(token) if claims::is_expired(token, self.leeway) => AccessState::Expired,
            Some(_) => AccessState::Valid,
        };

        match (access, refresh_token, class) {
            (AccessState::Valid, _, PathClass::AuthOnly) => {
                debug!(path, "Authenticated user on auth-only path");
                Admission::RedirectHome
            }
            (AccessState::Absent, None, PathClass::Protected) => {
                debug!(path, "No credentials on protected path");
                Admission::RedirectToLogin {
                    callback: Some(path.to_string()),
                    clear_cookies: false,
                }
            }
            (AccessState::Expired, Some(refresh), _) => {
                self.refresh_and_decide(path, refresh, class).await
            }
            (AccessState::Absent, Some(refresh), PathClass::Protected) => {
                self.refresh_and_decide(path, refresh, class).await
            }
            _ => Admission::Continue,
        }
    }

    /// One refresh attempt; success rotates cookies, failure redirects on
    /// protected paths and continues unauthenticated elsewhere.
    async fn refresh_and_decide(
        &self,
        path: &str,
        refresh_token: &str,
        class: PathClass,
    ) -> Admission {
        match self.refresher.refresh(refresh_token).await {
            Ok(grant) => {
                debug!(path, "Edge refresh succeeded, rotating cookies");
                Admission::Rotate(grant)
            }
            Err(e) if class == PathClass::Protected => {
                warn!(path, error = %e, "Edge refresh failed on protected path");
                Admission::RedirectToLogin {
                    callback: Some(path.to_string()),
                    clear_cookies: true,
                }
            }
            Err(e) => {
                warn!(path, error = %e, "Edge refresh failed, continuing unauthenticated");
                Admission::Continue
            }
        }
    }
}
