//! # wirechat-auth
//!
//! Credential lifecycle for the WireChat client:
//!
//! - `credentials` — the atomic access/refresh credential pair
//! - `claims` — unverified JWT payload inspection (expiry checks only)
//! - `store` — credential storage backends (memory, file)
//! - `refresher` — the refresh transport trait and its HTTP implementation
//! - `coordinator` — single-flight refresh coordination
//!
//! The coordinator is the only component allowed to rotate the stored
//! credential pair on the client side.

pub mod claims;
pub mod coordinator;
pub mod credentials;
pub mod refresher;
pub mod store;

pub use coordinator::RefreshCoordinator;
pub use credentials::{CredentialPair, TokenGrant};
pub use refresher::{HttpTokenRefresher, TokenRefresher};
pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
