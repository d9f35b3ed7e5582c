//! Single-flight credential refresh coordination.
//!
//! Arbitrarily many concurrent callers may report a stale credential; the
//! coordinator collapses them into exactly one network refresh call. The
//! in-flight refresh is represented by a broadcast channel held under a
//! mutex: the first stale caller becomes the leader and performs the call,
//! everyone arriving while it runs subscribes and awaits the shared
//! outcome. The channel is always signalled when the refresh settles, so
//! no waiter is ever left pending.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use wirechat_core::config::AuthConfig;
use wirechat_core::error::AppError;

use crate::refresher::TokenRefresher;
use crate::store::CredentialStore;

/// How an in-flight refresh settled. Every waiter observes the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new credential pair was stored; callers may proceed.
    Refreshed,
    /// The refresh failed; the store was cleared and the user must log in.
    Unauthenticated,
}

enum Role {
    /// The stored credential is already fresh.
    Fresh,
    /// A refresh is in flight; await its outcome.
    Waiter(broadcast::Receiver<RefreshOutcome>),
    /// This caller performs the refresh and fans the outcome out.
    Leader(broadcast::Sender<RefreshOutcome>),
}

/// Coordinates credential refreshes with the single-flight invariant.
pub struct RefreshCoordinator {
    store: Arc<dyn CredentialStore>,
    refresher: Arc<dyn TokenRefresher>,
    /// Tokens expiring within this margin count as stale.
    leeway: Duration,
    /// Present exactly while a refresh is in flight.
    inflight: Mutex<Option<broadcast::Sender<RefreshOutcome>>>,
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("leeway", &self.leeway)
            .finish()
    }
}

impl RefreshCoordinator {
    /// Creates a coordinator over the given store and refresh transport.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        refresher: Arc<dyn TokenRefresher>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            store,
            refresher,
            leeway: Duration::seconds(config.refresh_leeway_seconds as i64),
            inflight: Mutex::new(None),
        }
    }

    /// Ensures the stored access credential is usable.
    ///
    /// Returns `Ok(())` when a fresh credential is available — either it
    /// already was, or exactly one refresh call obtained a new pair shared
    /// by every concurrent caller. Returns `Unauthorized` when the refresh
    /// failed or no credentials are stored; the store is cleared in that
    /// case and the user must re-authenticate.
    pub async fn ensure_fresh(&self) -> Result<(), AppError> {
        let role = {
            let mut guard = self.lock_inflight();
            if let Some(tx) = guard.as_ref() {
                Role::Waiter(tx.subscribe())
            } else if self
                .store
                .read()
                .is_some_and(|pair| !pair.is_stale(self.leeway))
            {
                Role::Fresh
            } else {
                let (tx, _) = broadcast::channel(1);
                *guard = Some(tx.clone());
                Role::Leader(tx)
            }
        };

        match role {
            Role::Fresh => Ok(()),
            Role::Waiter(mut rx) => {
                debug!("Refresh already in flight, awaiting shared outcome");
                match rx.recv().await {
                    Ok(RefreshOutcome::Refreshed) => Ok(()),
                    // A closed channel means the leader settled without a
                    // stored pair; treat it the same as a failed refresh.
                    Ok(RefreshOutcome::Unauthenticated) | Err(_) => {
                        Err(Self::unauthenticated())
                    }
                }
            }
            Role::Leader(tx) => {
                let outcome = self.run_refresh().await;
                *self.lock_inflight() = None;
                let _ = tx.send(outcome);
                match outcome {
                    RefreshOutcome::Refreshed => Ok(()),
                    RefreshOutcome::Unauthenticated => Err(Self::unauthenticated()),
                }
            }
        }
    }

    /// Performs the one refresh call and updates the store.
    async fn run_refresh(&self) -> RefreshOutcome {
        let Some(pair) = self.store.read() else {
            debug!("No stored credentials to refresh");
            return RefreshOutcome::Unauthenticated;
        };

        match self.refresher.refresh(&pair.refresh_token).await {
            Ok(grant) => {
                self.store.write(grant.into_pair());
                info!("Access credential refreshed");
                RefreshOutcome::Refreshed
            }
            Err(e) => {
                warn!(error = %e, "Credential refresh failed, clearing stored pair");
                self.store.clear();
                RefreshOutcome::Unauthenticated
            }
        }
    }

    fn unauthenticated() -> AppError {
        AppError::unauthorized("Session expired, please log in again")
    }

    fn lock_inflight(&self) -> MutexGuard<'_, Option<broadcast::Sender<RefreshOutcome>>> {
        // The guard only protects an Option swap; recover from poisoning.
        match self.inflight.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
