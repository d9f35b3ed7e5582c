//! # wirechat-edge
//!
//! The edge admission filter: runs once per incoming navigation, ahead of
//! any page logic, and decides whether the request continues, gets its
//! credential cookies rotated, or is redirected. The filter itself is
//! transport-agnostic ([`AdmissionFilter`] takes a path and the two cookie
//! values); [`middleware`] adapts it to an `axum` layer.
//!
//! The filter never returns an error toward the renderer — a failed
//! refresh resolves to a redirect or a continue, never an exception. It
//! protects user experience only; the backend re-verifies every
//! credential.

pub mod cookies;
pub mod filter;
pub mod middleware;
pub mod paths;

pub use filter::{Admission, AdmissionFilter};
pub use middleware::{EdgeState, admission_middleware};
pub use paths::{PathClass, PathPolicy};
