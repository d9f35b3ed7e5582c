//! Conversation endpoints.

use std::sync::Arc;

use uuid::Uuid;

use wirechat_core::error::AppError;
use wirechat_core::types::pagination::{CursorQuery, Page};
use wirechat_entity::conversation::{ConversationWithMembers, CreateConversation};

use crate::client::ApiClient;
use crate::endpoints;
use crate::request::ApiRequest;

/// Typed surface over the conversation endpoints.
#[derive(Debug)]
pub struct ConversationsApi {
    client: Arc<ApiClient>,
}

impl ConversationsApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Fetches one page of the current user's conversations, most recent
    /// activity first.
    pub async fn list(
        &self,
        query: &CursorQuery,
    ) -> Result<Page<ConversationWithMembers>, AppError> {
        self.client
            .get_page(endpoints::conversations::LIST, query)
            .await
    }

    /// Fetches a single conversation with its member list.
    pub async fn get(&self, id: Uuid) -> Result<ConversationWithMembers, AppError> {
        self.client
            .send_enveloped(ApiRequest::get(endpoints::conversations::by_id(id)))
            .await
    }

    /// Creates a direct or group conversation.
    pub async fn create(
        &self,
        payload: &CreateConversation,
    ) -> Result<ConversationWithMembers, AppError> {
        self.client
            .send_enveloped(ApiRequest::post(endpoints::conversations::LIST).json(payload)?)
            .await
    }
}
