//! Auth-state driving policy.
//!
//! The manager itself only exposes `connect`/`disconnect`; this binding
//! implements the policy of connecting while a user is authenticated and
//! disconnecting when the session ends.

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::manager::SocketManager;

/// Follows an authenticated-state channel: `true` connects, `false`
/// disconnects. The current value is applied immediately, then every
/// change. The task ends when the sender is dropped.
pub fn bind_auth_state(
    manager: SocketManager,
    mut authenticated: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let is_authenticated = *authenticated.borrow_and_update();
            debug!(is_authenticated, "Applying auth state to realtime connection");
            if is_authenticated {
                manager.connect();
            } else {
                manager.disconnect();
            }
            if authenticated.changed().await.is_err() {
                debug!("Auth state channel closed, leaving realtime binding");
                return;
            }
        }
    })
}
