//! Authentication endpoint surface.
//!
//! Login and registration are the only places besides the refresh
//! coordinator that write the credential pair; both bypass bearer
//! attachment entirely.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use wirechat_auth::credentials::TokenGrant;
use wirechat_auth::store::CredentialStore;
use wirechat_core::error::AppError;
use wirechat_entity::user::User;

use crate::client::ApiClient;
use crate::endpoints;
use crate::request::ApiRequest;

/// Login request payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Registration request payload.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Response of a successful login or registration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    /// The authenticated user.
    pub user: User,
    /// The issued credential pair.
    pub tokens: TokenGrant,
}

/// Typed surface over the auth endpoints.
pub struct AuthApi {
    client: Arc<ApiClient>,
    store: Arc<dyn CredentialStore>,
}

impl std::fmt::Debug for AuthApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthApi").finish_non_exhaustive()
    }
}

impl AuthApi {
    /// Creates the auth surface.
    pub fn new(client: Arc<ApiClient>, store: Arc<dyn CredentialStore>) -> Self {
        Self { client, store }
    }

    /// Logs in and stores the issued credential pair.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AppError> {
        let request = ApiRequest::post(endpoints::auth::LOGIN)
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })?
            .skip_auth();

        let session: AuthSession = self.client.send(request).await?;
        self.store.write(session.tokens.into_pair());
        Ok(session.user)
    }

    /// Registers a new account and stores the issued credential pair.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        let request = ApiRequest::post(endpoints::auth::REGISTER)
            .json(&RegisterRequest {
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            })?
            .skip_auth();

        let session: AuthSession = self.client.send(request).await?;
        self.store.write(session.tokens.into_pair());
        Ok(session.user)
    }

    /// Logs out: best-effort server-side invalidation, then clears the
    /// local credential pair unconditionally.
    pub async fn logout(&self) -> Result<(), AppError> {
        if let Err(e) = self
            .client
            .send_empty(ApiRequest::post(endpoints::auth::LOGOUT))
            .await
        {
            warn!(error = %e, "Server-side logout failed, clearing local credentials anyway");
        }
        self.store.clear();
        Ok(())
    }

    /// Fetches the currently authenticated user.
    pub async fn me(&self) -> Result<User, AppError> {
        self.client.send(ApiRequest::get(endpoints::auth::ME)).await
    }
}
