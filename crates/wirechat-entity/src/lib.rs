//! # wirechat-entity
//!
//! Domain entity models for the WireChat client. Every struct mirrors a
//! JSON object the backend sends or accepts; all entities derive `Debug`,
//! `Clone`, `Serialize`, and `Deserialize` with camelCase field names on
//! the wire.

pub mod conversation;
pub mod friend;
pub mod message;
pub mod user;
