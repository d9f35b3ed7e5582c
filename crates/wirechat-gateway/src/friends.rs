//! Friend and friend-request endpoints.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use wirechat_core::error::AppError;
use wirechat_core::types::pagination::{CursorQuery, Page};
use wirechat_entity::friend::{Friend, FriendRequest};

use crate::client::ApiClient;
use crate::endpoints;
use crate::request::ApiRequest;

/// Payload to send a friend request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendFriendRequest {
    /// The user to befriend.
    pub receiver_id: Uuid,
}

/// Badge payload for pending incoming requests.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct IncomingCount {
    /// Number of pending incoming requests.
    pub count: u64,
}

/// Typed surface over the friend endpoints.
#[derive(Debug)]
pub struct FriendsApi {
    client: Arc<ApiClient>,
}

impl FriendsApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Fetches one page of the friend list.
    pub async fn list(&self, query: &CursorQuery) -> Result<Page<Friend>, AppError> {
        self.client.get_page(endpoints::friends::LIST, query).await
    }

    /// Fetches one page of pending incoming requests.
    pub async fn incoming_requests(
        &self,
        query: &CursorQuery,
    ) -> Result<Page<FriendRequest>, AppError> {
        self.client
            .get_page(endpoints::friends::INCOMING, query)
            .await
    }

    /// Fetches one page of pending outgoing requests.
    pub async fn outgoing_requests(
        &self,
        query: &CursorQuery,
    ) -> Result<Page<FriendRequest>, AppError> {
        self.client
            .get_page(endpoints::friends::OUTGOING, query)
            .await
    }

    /// Fetches the number of pending incoming requests.
    pub async fn incoming_count(&self) -> Result<u64, AppError> {
        let payload: IncomingCount = self
            .client
            .send_enveloped(ApiRequest::get(endpoints::friends::INCOMING_COUNT))
            .await?;
        Ok(payload.count)
    }

    /// Sends a friend request to another user.
    pub async fn send_request(&self, receiver_id: Uuid) -> Result<FriendRequest, AppError> {
        self.client
            .send_enveloped(
                ApiRequest::post(endpoints::friends::REQUESTS)
                    .json(&SendFriendRequest { receiver_id })?,
            )
            .await
    }

    /// Accepts an incoming friend request.
    pub async fn accept(&self, request_id: Uuid) -> Result<Friend, AppError> {
        self.client
            .send_enveloped(ApiRequest::post(endpoints::friends::accept(request_id)))
            .await
    }

    /// Declines an incoming friend request.
    pub async fn decline(&self, request_id: Uuid) -> Result<(), AppError> {
        self.client
            .send_empty(ApiRequest::post(endpoints::friends::decline(request_id)))
            .await
    }
}
