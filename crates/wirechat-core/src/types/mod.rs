//! Shared wire types exchanged with the backend.

pub mod pagination;
pub mod response;

pub use pagination::{CursorQuery, Page, PageInfo};
pub use response::ApiEnvelope;
