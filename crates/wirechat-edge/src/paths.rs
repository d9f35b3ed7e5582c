//! Navigation path classification.

use wirechat_core::config::EdgeConfig;

/// What a navigation path requires of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    /// Requires an authenticated session.
    Protected,
    /// Reserved for unauthenticated users (login, register).
    AuthOnly,
    /// No session requirement.
    Public,
}

/// Classifies paths by the configured prefix lists.
#[derive(Debug, Clone)]
pub struct PathPolicy {
    protected: Vec<String>,
    auth_only: Vec<String>,
}

impl PathPolicy {
    /// Builds a policy from the edge configuration.
    pub fn new(config: &EdgeConfig) -> Self {
        Self {
            protected: config.protected_paths.clone(),
            auth_only: config.auth_paths.clone(),
        }
    }

    /// Classifies a request path. Prefixes match on segment boundaries, so
    /// `/friends` covers `/friends/requests` but not `/friendship`.
    pub fn classify(&self, path: &str) -> PathClass {
        if Self::matches(&self.protected, path) {
            PathClass::Protected
        } else if Self::matches(&self.auth_only, path) {
            PathClass::AuthOnly
        } else {
            PathClass::Public
        }
    }

    fn matches(prefixes: &[String], path: &str) -> bool {
        prefixes.iter().any(|prefix| {
            path == prefix
                || path
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }
}
