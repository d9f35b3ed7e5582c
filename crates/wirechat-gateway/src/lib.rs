//! # wirechat-gateway
//!
//! The authenticated HTTP gateway to the WireChat backend. [`ApiClient`]
//! attaches the current bearer credential, detects expired-credential
//! rejections, drives the refresh coordinator, and retries the original
//! request exactly once. The typed modules (`auth`, `users`, `friends`,
//! `conversations`, `messages`) are thin endpoint surfaces over the client.

pub mod auth;
pub mod client;
pub mod conversations;
pub mod endpoints;
pub mod friends;
pub mod messages;
pub mod request;
pub mod users;

pub use auth::AuthApi;
pub use client::ApiClient;
pub use conversations::ConversationsApi;
pub use friends::FriendsApi;
pub use messages::MessagesApi;
pub use request::ApiRequest;
pub use users::UsersApi;
