//! The WebSocket connection manager.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use dashmap::DashMap;
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tracing::{debug, info, warn};

use wirechat_auth::store::CredentialStore;
use wirechat_core::config::RealtimeConfig;
use wirechat_core::error::AppError;

use crate::events::{EventRegistry, SubscriptionId};
use crate::protocol::{ClientFrame, ServerFrame};
use crate::status::ConnectionStatus;

/// Callback invoked on every status transition.
pub type StatusCallback = Arc<dyn Fn(ConnectionStatus) + Send + Sync>;

/// Callback invoked with low-level error messages.
pub type ErrorCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// How a live session ended.
enum SessionEnd {
    /// `disconnect()` or a newer `connect()` superseded this session.
    Superseded,
    /// The server closed the connection.
    RemoteClose,
    /// The handshake or transport failed.
    Failed,
}

/// Manages one realtime connection to the backend.
///
/// Cheap to clone; all clones share the same connection. Status
/// transitions fan out synchronously to every status subscriber before
/// the transitioning call returns, and a transition to the current status
/// is a no-op.
#[derive(Clone)]
pub struct SocketManager {
    inner: Arc<SocketInner>,
}

struct SocketInner {
    config: RealtimeConfig,
    store: Arc<dyn CredentialStore>,
    status: Mutex<ConnectionStatus>,
    status_subs: Mutex<Vec<(SubscriptionId, StatusCallback)>>,
    error_subs: Mutex<Vec<(SubscriptionId, ErrorCallback)>>,
    events: EventRegistry,
    /// Sender feeding the live session's write half; present only while
    /// a session is up.
    outbound: Mutex<Option<mpsc::UnboundedSender<Message>>>,
    /// Pending acknowledged emits by correlation id.
    acks: DashMap<u64, oneshot::Sender<Result<Value, AppError>>>,
    next_ack: AtomicU64,
    next_sub: AtomicU64,
    /// Consecutive failed connection attempts.
    attempts: AtomicU64,
    /// Bumped by `connect`/`disconnect`; a driver whose generation is
    /// stale stops without touching shared state.
    generation: AtomicU64,
}

impl std::fmt::Debug for SocketManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocketManager")
            .field("status", &self.status())
            .field("url", &self.inner.config.url)
            .finish_non_exhaustive()
    }
}

impl SocketManager {
    /// Creates a manager in the `disconnected` state.
    pub fn new(config: RealtimeConfig, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            inner: Arc::new(SocketInner {
                config,
                store,
                status: Mutex::new(ConnectionStatus::Disconnected),
                status_subs: Mutex::new(Vec::new()),
                error_subs: Mutex::new(Vec::new()),
                events: EventRegistry::new(),
                outbound: Mutex::new(None),
                acks: DashMap::new(),
                next_ack: AtomicU64::new(0),
                next_sub: AtomicU64::new(0),
                attempts: AtomicU64::new(0),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Current connection status.
    pub fn status(&self) -> ConnectionStatus {
        *lock(&self.inner.status)
    }

    /// Subscribes to status transitions.
    pub fn on_status(
        &self,
        callback: impl Fn(ConnectionStatus) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = self.inner.next_subscription();
        lock(&self.inner.status_subs).push((id, Arc::new(callback)));
        id
    }

    /// Removes a status subscriber.
    pub fn off_status(&self, id: SubscriptionId) {
        lock(&self.inner.status_subs).retain(|(sub_id, _)| *sub_id != id);
    }

    /// Subscribes to low-level error notifications. These fire without a
    /// status transition for remote error frames, and alongside the
    /// `error` status for failed connection attempts.
    pub fn on_error(&self, callback: impl Fn(&str) + Send + Sync + 'static) -> SubscriptionId {
        let id = self.inner.next_subscription();
        lock(&self.inner.error_subs).push((id, Arc::new(callback)));
        id
    }

    /// Removes an error subscriber.
    pub fn off_error(&self, id: SubscriptionId) {
        lock(&self.inner.error_subs).retain(|(sub_id, _)| *sub_id != id);
    }

    /// Subscribes to every occurrence of a pushed event.
    pub fn on(&self, event: &str, callback: impl Fn(&Value) + Send + Sync + 'static) -> SubscriptionId {
        self.inner.events.on(event, Arc::new(callback))
    }

    /// Subscribes to the next occurrence of a pushed event.
    pub fn once(
        &self,
        event: &str,
        callback: impl Fn(&Value) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.inner.events.once(event, Arc::new(callback))
    }

    /// Removes one event subscriber, or all of them for `event` when no
    /// id is given.
    pub fn off(&self, event: &str, id: Option<SubscriptionId>) {
        self.inner.events.off(event, id);
    }

    /// Opens the connection.
    ///
    /// No-op when already connected or connecting. Aborts with a warning
    /// when no access credential is stored; never returns an error. Must
    /// be called from within a Tokio runtime.
    pub fn connect(&self) {
        match self.status() {
            ConnectionStatus::Connected | ConnectionStatus::Connecting => {
                debug!(status = %self.status(), "Connect requested while already active");
                return;
            }
            _ => {}
        }
        let Some(pair) = self.inner.store.read() else {
            warn!("Connect requested without a stored access credential");
            return;
        };

        // Supersede any driver still backing off from a previous attempt.
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.attempts.store(0, Ordering::SeqCst);
        self.inner.set_status(ConnectionStatus::Connecting);

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            SocketInner::drive(inner, generation, pair.access_token).await;
        });
    }

    /// Tears the connection down: closes the transport, fails pending
    /// acknowledgements, clears event handlers, and resets the attempt
    /// counter. Idempotent.
    pub fn disconnect(&self) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        *lock(&self.inner.outbound) = None;
        self.inner.acks.clear();
        self.inner.events.clear();
        self.inner.attempts.store(0, Ordering::SeqCst);
        self.inner.set_status(ConnectionStatus::Disconnected);
    }

    /// Disconnects and reconnects so a rotated credential is used on the
    /// next handshake.
    pub fn reconnect_with_new_token(&self) {
        info!("Reconnecting with rotated credential");
        self.disconnect();
        self.connect();
    }

    /// Sends an event and awaits the server acknowledgement.
    ///
    /// Rejects immediately when not connected. A remote failure surfaces
    /// the remote error message.
    pub async fn emit(&self, event: &str, data: Value) -> Result<Value, AppError> {
        if self.status() != ConnectionStatus::Connected {
            return Err(AppError::realtime(format!(
                "Cannot emit '{event}': not connected"
            )));
        }

        let id = self.inner.next_ack.fetch_add(1, Ordering::SeqCst) + 1;
        let (tx, rx) = oneshot::channel();
        self.inner.acks.insert(id, tx);

        let frame = ClientFrame {
            id: Some(id),
            event: event.to_string(),
            data,
        };
        if let Err(e) = self.inner.send_frame(frame) {
            self.inner.acks.remove(&id);
            return Err(e);
        }

        match rx.await {
            Ok(result) => result,
            Err(_) => Err(AppError::realtime(
                "Connection closed before acknowledgement",
            )),
        }
    }

    /// Sends an event without awaiting acknowledgement. Warns and drops
    /// the frame when not connected.
    pub fn emit_no_ack(&self, event: &str, data: Value) {
        if self.status() != ConnectionStatus::Connected {
            warn!(event, "Dropping emit while not connected");
            return;
        }
        let frame = ClientFrame {
            id: None,
            event: event.to_string(),
            data,
        };
        if let Err(e) = self.inner.send_frame(frame) {
            warn!(event, error = %e, "Failed to queue frame");
        }
    }
}

impl SocketInner {
    /// Connection driver: one task per `connect()` call, running sessions
    /// and backoff until superseded or out of attempts.
    async fn drive(inner: Arc<SocketInner>, generation: u64, mut access_token: String) {
        loop {
            let end = inner.run_session(&access_token).await;

            if inner.generation.load(Ordering::SeqCst) != generation {
                return;
            }
            match end {
                SessionEnd::Superseded => return,
                SessionEnd::RemoteClose => {
                    debug!("Server closed the connection");
                    inner.set_status(ConnectionStatus::Disconnected);
                }
                SessionEnd::Failed => {}
            }

            let attempt = inner.attempts.fetch_add(1, Ordering::SeqCst) + 1;
            if attempt >= u64::from(inner.config.max_reconnect_attempts) {
                warn!(attempt, "Giving up on reconnection");
                inner.set_status(ConnectionStatus::Error);
                return;
            }

            let delay = backoff_delay(&inner.config, attempt);
            debug!(attempt, delay_ms = delay.as_millis() as u64, "Reconnecting after backoff");
            tokio::time::sleep(delay).await;
            if inner.generation.load(Ordering::SeqCst) != generation {
                return;
            }

            // Pick up a credential rotated while we were backing off.
            if let Some(pair) = inner.store.read() {
                access_token = pair.access_token;
            }
            inner.set_status(ConnectionStatus::Connecting);
        }
    }

    /// One handshake plus pump loop.
    async fn run_session(&self, access_token: &str) -> SessionEnd {
        let request = match handshake_request(&self.config.url, access_token) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Cannot build handshake request");
                self.set_status(ConnectionStatus::Error);
                self.notify_error(&e.to_string());
                return SessionEnd::Failed;
            }
        };

        let connect_timeout = Duration::from_secs(self.config.connect_timeout_seconds);
        let stream = match timeout(connect_timeout, connect_async(request)).await {
            Ok(Ok((stream, _response))) => stream,
            Ok(Err(e)) => {
                warn!(error = %e, "Connection attempt failed");
                self.set_status(ConnectionStatus::Error);
                self.notify_error(&format!("Connection failed: {e}"));
                return SessionEnd::Failed;
            }
            Err(_) => {
                warn!(timeout_seconds = self.config.connect_timeout_seconds, "Connection attempt timed out");
                self.set_status(ConnectionStatus::Error);
                self.notify_error("Connection attempt timed out");
                return SessionEnd::Failed;
            }
        };

        let (queue_tx, mut queue_rx) = mpsc::unbounded_channel::<Message>();
        *lock(&self.outbound) = Some(queue_tx);
        self.attempts.store(0, Ordering::SeqCst);
        self.set_status(ConnectionStatus::Connected);
        info!(url = %self.config.url, "Realtime connection established");

        let (mut sink, mut read) = stream.split();
        let end = loop {
            tokio::select! {
                queued = queue_rx.recv() => match queued {
                    Some(message) => {
                        if let Err(e) = sink.send(message).await {
                            warn!(error = %e, "Failed to send frame");
                            self.set_status(ConnectionStatus::Error);
                            self.notify_error(&format!("Transport error: {e}"));
                            break SessionEnd::Failed;
                        }
                    }
                    // The sender was dropped by disconnect(); say goodbye.
                    None => {
                        let _ = sink.send(Message::Close(None)).await;
                        break SessionEnd::Superseded;
                    }
                },
                incoming = read.next() => match incoming {
                    Some(Ok(Message::Text(text))) => self.handle_frame(text.as_str()),
                    Some(Ok(Message::Close(_))) | None => break SessionEnd::RemoteClose,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(error = %e, "Transport error");
                        self.set_status(ConnectionStatus::Error);
                        self.notify_error(&format!("Transport error: {e}"));
                        break SessionEnd::Failed;
                    }
                },
            }
        };

        *lock(&self.outbound) = None;
        // Dropping the senders resolves every pending emit as closed.
        self.acks.clear();
        end
    }

    /// Routes one inbound frame: acknowledgement, reserved error event,
    /// or push dispatch.
    fn handle_frame(&self, text: &str) {
        match serde_json::from_str::<ServerFrame>(text) {
            Ok(ServerFrame::Ack {
                ack,
                success,
                data,
                error,
            }) => {
                let Some((_, tx)) = self.acks.remove(&ack) else {
                    debug!(ack, "Acknowledgement with no pending emit");
                    return;
                };
                let result = if success {
                    Ok(data.unwrap_or(Value::Null))
                } else {
                    Err(AppError::realtime(
                        error.unwrap_or_else(|| "Remote operation failed".to_string()),
                    ))
                };
                let _ = tx.send(result);
            }
            Ok(ServerFrame::Push { event, data }) => {
                if event == "error" {
                    let message = data
                        .get("message")
                        .and_then(Value::as_str)
                        .unwrap_or("Remote error");
                    self.notify_error(message);
                } else {
                    self.events.dispatch(&event, &data);
                }
            }
            Err(e) => debug!(error = %e, "Ignoring unparseable frame"),
        }
    }

    fn send_frame(&self, frame: ClientFrame) -> Result<(), AppError> {
        let text = serde_json::to_string(&frame)?;
        match lock(&self.outbound).as_ref() {
            Some(tx) => tx
                .send(Message::text(text))
                .map_err(|_| AppError::realtime("Connection is shutting down")),
            None => Err(AppError::realtime("Cannot send: not connected")),
        }
    }

    /// Transitions the status, notifying every subscriber before
    /// returning. A transition to the current status is a no-op.
    fn set_status(&self, next: ConnectionStatus) {
        {
            let mut guard = lock(&self.status);
            if *guard == next {
                return;
            }
            *guard = next;
        }
        debug!(status = %next, "Connection status changed");
        let subscribers: Vec<StatusCallback> = lock(&self.status_subs)
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in subscribers {
            callback(next);
        }
    }

    fn notify_error(&self, message: &str) {
        let subscribers: Vec<ErrorCallback> = lock(&self.error_subs)
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in subscribers {
            callback(message);
        }
    }

    fn next_subscription(&self) -> SubscriptionId {
        SubscriptionId(self.next_sub.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

/// Delay before reconnection attempt `attempt` (1-based): doubles from
/// the base delay, capped at the configured maximum.
fn backoff_delay(config: &RealtimeConfig, attempt: u64) -> Duration {
    let exponent = attempt.saturating_sub(1).min(16) as u32;
    let delay = config
        .reconnect_base_delay_ms
        .saturating_mul(1u64 << exponent);
    Duration::from_millis(delay.min(config.reconnect_max_delay_ms))
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Subscriber callbacks may panic; keep the manager usable afterwards.
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn handshake_request(
    url: &str,
    access_token: &str,
) -> Result<tokio_tungstenite::tungstenite::handshake::client::Request, AppError> {
    let mut request = url
        .into_client_request()
        .map_err(|e| AppError::realtime(format!("Invalid realtime URL: {e}")).with_source(e))?;
    let value = http::HeaderValue::from_str(&format!("Bearer {access_token}"))
        .map_err(|e| AppError::realtime("Access token is not header-safe").with_source(e))?;
    request
        .headers_mut()
        .insert(http::header::AUTHORIZATION, value);
    Ok(request)
}
