//! Message history and send endpoints.

use std::sync::Arc;

use uuid::Uuid;

use wirechat_core::error::AppError;
use wirechat_core::types::pagination::{CursorQuery, Page};
use wirechat_entity::message::{Message, SendMessage};

use crate::client::ApiClient;
use crate::endpoints;
use crate::request::ApiRequest;

/// Typed surface over the message endpoints.
#[derive(Debug)]
pub struct MessagesApi {
    client: Arc<ApiClient>,
}

impl MessagesApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Fetches one page of a conversation's history, newest first.
    pub async fn list(
        &self,
        conversation_id: Uuid,
        query: &CursorQuery,
    ) -> Result<Page<Message>, AppError> {
        self.client
            .get_page(endpoints::conversations::messages(conversation_id), query)
            .await
    }

    /// Sends a message into a conversation.
    pub async fn send(&self, payload: &SendMessage) -> Result<Message, AppError> {
        self.client
            .send_enveloped(
                ApiRequest::post(endpoints::conversations::messages(payload.conversation_id))
                    .json(payload)?,
            )
            .await
    }
}
