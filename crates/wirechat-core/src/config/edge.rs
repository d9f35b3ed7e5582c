//! Edge admission filter configuration.

use serde::{Deserialize, Serialize};

/// Path classification and redirect targets for the edge admission filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeConfig {
    /// Path prefixes that require authentication.
    #[serde(default = "default_protected_paths")]
    pub protected_paths: Vec<String>,
    /// Path prefixes reserved for unauthenticated users (login/register).
    #[serde(default = "default_auth_paths")]
    pub auth_paths: Vec<String>,
    /// Where unauthenticated requests to protected paths are redirected.
    #[serde(default = "default_login_path")]
    pub login_path: String,
    /// Where authenticated requests to auth-only paths are redirected.
    #[serde(default = "default_home_path")]
    pub home_path: String,
    /// Query parameter carrying the originally requested path.
    #[serde(default = "default_callback_param")]
    pub callback_param: String,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            protected_paths: default_protected_paths(),
            auth_paths: default_auth_paths(),
            login_path: default_login_path(),
            home_path: default_home_path(),
            callback_param: default_callback_param(),
        }
    }
}

fn default_protected_paths() -> Vec<String> {
    vec![
        "/conversations".to_string(),
        "/friends".to_string(),
        "/settings".to_string(),
        "/profile".to_string(),
    ]
}

fn default_auth_paths() -> Vec<String> {
    vec!["/login".to_string(), "/register".to_string()]
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_home_path() -> String {
    "/".to_string()
}

fn default_callback_param() -> String {
    "callbackUrl".to_string()
}
