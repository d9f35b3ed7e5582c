//! Backend endpoint paths, grouped by feature.

use uuid::Uuid;

/// Authentication endpoints.
pub mod auth {
    pub const LOGIN: &str = "/auth/login";
    pub const REGISTER: &str = "/auth/register";
    pub const LOGOUT: &str = "/auth/logout";
    pub const REFRESH: &str = "/auth/refresh";
    pub const ME: &str = "/auth/me";
}

/// User endpoints.
pub mod users {
    use super::Uuid;

    pub const SUGGESTIONS: &str = "/users/suggestions";

    pub fn profile(id: Uuid) -> String {
        format!("/users/{id}")
    }
}

/// Friend and friend-request endpoints.
pub mod friends {
    use super::Uuid;

    pub const LIST: &str = "/friends";
    pub const REQUESTS: &str = "/friends/requests";
    pub const INCOMING: &str = "/friends/requests/incoming";
    pub const INCOMING_COUNT: &str = "/friends/requests/incoming/count";
    pub const OUTGOING: &str = "/friends/requests/outgoing";

    pub fn accept(request_id: Uuid) -> String {
        format!("/friends/requests/{request_id}/accept")
    }

    pub fn decline(request_id: Uuid) -> String {
        format!("/friends/requests/{request_id}/decline")
    }
}

/// Conversation endpoints.
pub mod conversations {
    use super::Uuid;

    pub const LIST: &str = "/conversations";

    pub fn by_id(id: Uuid) -> String {
        format!("/conversations/{id}")
    }

    pub fn messages(id: Uuid) -> String {
        format!("/conversations/{id}/messages")
    }
}
