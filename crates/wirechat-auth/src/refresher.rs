//! The refresh transport: one POST to the backend refresh endpoint.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use wirechat_core::config::ApiConfig;
use wirechat_core::error::AppError;

use crate::credentials::TokenGrant;

/// Exchanges a refresh token for a new token grant.
///
/// Behind a trait so the coordinator and the edge filter can be exercised
/// without a live backend.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Performs one refresh call. Never retries.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, AppError>;
}

/// HTTP implementation posting `{refreshToken}` to `/auth/refresh`.
#[derive(Debug, Clone)]
pub struct HttpTokenRefresher {
    http: reqwest::Client,
    refresh_url: String,
}

impl HttpTokenRefresher {
    /// Creates a refresher against the configured API base URL.
    pub fn new(config: &ApiConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::request_misconfigured(format!("Failed to build HTTP client: {e}"))
                    .with_source(e)
            })?;
        Ok(Self {
            http,
            refresh_url: format!("{}/auth/refresh", config.base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl TokenRefresher for HttpTokenRefresher {
    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, AppError> {
        debug!(url = %self.refresh_url, "Requesting token refresh");

        let response = self
            .http
            .post(&self.refresh_url)
            .json(&serde_json::json!({ "refreshToken": refresh_token }))
            .send()
            .await
            .map_err(|e| {
                AppError::network_unreachable(format!("Refresh request failed: {e}"))
                    .with_source(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(AppError::from_response(status.as_u16(), &body));
        }

        response.json::<TokenGrant>().await.map_err(|e| {
            AppError::serialization(format!("Malformed refresh response: {e}")).with_source(e)
        })
    }
}
