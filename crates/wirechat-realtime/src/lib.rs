//! # wirechat-realtime
//!
//! The realtime connection manager: one WebSocket connection to the
//! backend with a `disconnected/connecting/connected/error` status
//! machine, synchronous status fan-out, exponential reconnection backoff,
//! named-event subscriptions, and acknowledgement-correlated emit.
//!
//! The manager only exposes `connect`/`disconnect`/status; the policy of
//! connecting when a user is authenticated lives in [`binding`].

pub mod binding;
pub mod events;
pub mod manager;
pub mod protocol;
pub mod status;

pub use binding::bind_auth_state;
pub use events::SubscriptionId;
pub use manager::SocketManager;
pub use status::ConnectionStatus;
