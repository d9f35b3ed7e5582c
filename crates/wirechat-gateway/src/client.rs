//! The authenticated API client.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use wirechat_auth::coordinator::RefreshCoordinator;
use wirechat_auth::store::CredentialStore;
use wirechat_core::config::ApiConfig;
use wirechat_core::error::AppError;
use wirechat_core::types::pagination::{CursorQuery, Page};
use wirechat_core::types::response::ApiEnvelope;

use crate::request::ApiRequest;

/// HTTP gateway to the backend.
///
/// Every authenticated request gets the current access token attached as a
/// bearer credential. A 401 response triggers the refresh coordinator and
/// one resend of the original request with the rotated credential; a second
/// 401 is surfaced as `Unauthorized`. The retry flag is per request, so
/// independent requests failing concurrently each get their own single
/// retry while sharing the one in-flight refresh.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn CredentialStore>,
    coordinator: Arc<RefreshCoordinator>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ApiClient {
    /// Creates a client against the configured backend.
    pub fn new(
        config: &ApiConfig,
        store: Arc<dyn CredentialStore>,
        coordinator: Arc<RefreshCoordinator>,
    ) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::request_misconfigured(format!("Failed to build HTTP client: {e}"))
                    .with_source(e)
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            store,
            coordinator,
        })
    }

    /// Executes a request, handling credential refresh and the single retry.
    ///
    /// Returns the raw successful response; every rejection is normalized
    /// into an [`AppError`] and never silently swallowed.
    pub async fn execute(&self, request: &ApiRequest) -> Result<reqwest::Response, AppError> {
        let mut retried = false;
        loop {
            let response = self.dispatch(request).await?;
            let status = response.status().as_u16();

            if status == 401 && !request.skip_auth && !retried {
                debug!(path = %request.path, "Credential rejected, driving refresh");
                retried = true;
                self.coordinator.ensure_fresh().await?;
                continue;
            }

            if !(200..300).contains(&status) {
                let body = response.bytes().await.unwrap_or_default();
                let err = AppError::from_response(status, &body);
                warn!(path = %request.path, status, kind = %err.kind, "Request rejected");
                return Err(err);
            }

            return Ok(response);
        }
    }

    /// Executes a request and deserializes the JSON response body.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, AppError> {
        let response = self.execute(&request).await?;
        response.json::<T>().await.map_err(|e| {
            AppError::serialization(format!("Malformed response body: {e}")).with_source(e)
        })
    }

    /// Executes a request wrapped in the standard `{success, data}` envelope.
    pub async fn send_enveloped<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<T, AppError> {
        let envelope: ApiEnvelope<T> = self.send(request).await?;
        envelope.into_data()
    }

    /// Executes a request, discarding any response body.
    pub async fn send_empty(&self, request: ApiRequest) -> Result<(), AppError> {
        self.execute(&request).await?;
        Ok(())
    }

    /// Fetches one page of a cursor-paginated collection.
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        path: impl Into<String>,
        query: &CursorQuery,
    ) -> Result<Page<T>, AppError> {
        self.send(ApiRequest::get(path).query_pairs(query.to_query_pairs()))
            .await
    }

    /// Builds and dispatches the underlying HTTP request once.
    async fn dispatch(&self, request: &ApiRequest) -> Result<reqwest::Response, AppError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.http.request(request.method.clone(), &url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if !request.skip_auth
            && let Some(pair) = self.store.read()
        {
            builder = builder.bearer_auth(&pair.access_token);
        }

        debug!(method = %request.method, url = %url, "Dispatching request");
        builder.send().await.map_err(Self::transport_error)
    }

    /// Maps a transport-level failure into the error taxonomy.
    fn transport_error(err: reqwest::Error) -> AppError {
        if err.is_builder() {
            AppError::request_misconfigured(format!("Request could not be built: {err}"))
                .with_source(err)
        } else {
            AppError::network_unreachable(format!("Unable to reach server: {err}"))
                .with_source(err)
        }
    }
}
