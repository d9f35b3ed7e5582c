//! User discovery endpoints.

use std::sync::Arc;

use wirechat_core::error::AppError;
use wirechat_entity::user::PublicUser;

use crate::client::ApiClient;
use crate::endpoints;
use crate::request::ApiRequest;

/// Typed surface over the user endpoints.
#[derive(Debug)]
pub struct UsersApi {
    client: Arc<ApiClient>,
}

impl UsersApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Fetches friend suggestions for the current user.
    pub async fn suggestions(&self) -> Result<Vec<PublicUser>, AppError> {
        self.client
            .send_enveloped(ApiRequest::get(endpoints::users::SUGGESTIONS))
            .await
    }

    /// Fetches another user's public profile.
    pub async fn profile(&self, id: uuid::Uuid) -> Result<PublicUser, AppError> {
        self.client
            .send_enveloped(ApiRequest::get(endpoints::users::profile(id)))
            .await
    }
}
