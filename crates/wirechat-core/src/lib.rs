//! # wirechat-core
//!
//! Core crate for the WireChat client platform. Contains configuration
//! schemas, shared wire types (pagination, response envelope), and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other WireChat crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
