//! End-to-end exercises of the client against a mock backend: credential
//! attachment, the 401 refresh-and-retry path, single-flight refresh under
//! concurrency, and error normalization.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use chrono::{Duration, Utc};
use serde_json::json;

use wirechat_auth::coordinator::RefreshCoordinator;
use wirechat_auth::credentials::CredentialPair;
use wirechat_auth::refresher::HttpTokenRefresher;
use wirechat_auth::store::{CredentialStore, MemoryCredentialStore};
use wirechat_core::config::{ApiConfig, AuthConfig};
use wirechat_core::error::ErrorKind;
use wirechat_gateway::{ApiClient, ApiRequest};

/// Shared mock-backend state: which access token is currently valid and
/// how often each endpoint was hit.
struct Backend {
    valid_access: std::sync::Mutex<String>,
    refresh_calls: AtomicUsize,
    protected_calls: AtomicUsize,
}

impl Backend {
    fn new(initial_access: &str) -> Self {
        Self {
            valid_access: std::sync::Mutex::new(initial_access.to_string()),
            refresh_calls: AtomicUsize::new(0),
            protected_calls: AtomicUsize::new(0),
        }
    }

    fn bearer_is_valid(&self, headers: &HeaderMap) -> bool {
        let expected = format!(
            "Bearer {}",
            self.valid_access.lock().expect("lock").as_str()
        );
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == expected)
    }
}

async fn protected(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
) -> (StatusCode, Json<serde_json::Value>) {
    backend.protected_calls.fetch_add(1, Ordering::SeqCst);
    if backend.bearer_is_valid(&headers) {
        (StatusCode::OK, Json(json!({ "ok": true })))
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Token expired" })),
        )
    }
}

async fn refresh(State(backend): State<Arc<Backend>>) -> Json<serde_json::Value> {
    let n = backend.refresh_calls.fetch_add(1, Ordering::SeqCst) + 1;
    let access = format!("access-{n}");
    *backend.valid_access.lock().expect("lock") = access.clone();
    Json(json!({
        "accessToken": access,
        "refreshToken": format!("refresh-{n}"),
        "expiresIn": 900,
        "tokenType": "Bearer",
    }))
}

async fn always_unauthorized() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Nope" })),
    )
}

async fn validation_failure() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
            "message": "Validation failed",
            "error": "VALIDATION_ERROR",
            "errors": { "email": ["must be a valid address"] },
        })),
    )
}

async fn public_pong() -> Json<serde_json::Value> {
    Json(json!({ "pong": true }))
}

/// Starts the mock backend and returns its state plus the API config
/// pointing at it.
async fn spawn_backend(initial_access: &str) -> (Arc<Backend>, ApiConfig) {
    let backend = Arc::new(Backend::new(initial_access));
    let app = axum::Router::new()
        .route("/api/v1/protected", get(protected))
        .route("/api/v1/auth/refresh", post(refresh))
        .route("/api/v1/locked", get(always_unauthorized))
        .route("/api/v1/invalid", post(validation_failure))
        .route("/api/v1/ping", get(public_pong))
        .with_state(Arc::clone(&backend));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    let config = ApiConfig {
        base_url: format!("http://{addr}/api/v1"),
        timeout_seconds: 5,
    };
    (backend, config)
}

fn build_client(
    config: &ApiConfig,
    store: Arc<MemoryCredentialStore>,
) -> Arc<ApiClient> {
    let refresher = Arc::new(HttpTokenRefresher::new(config).expect("refresher"));
    let coordinator = Arc::new(RefreshCoordinator::new(
        Arc::clone(&store) as Arc<dyn CredentialStore>,
        refresher,
        &AuthConfig::default(),
    ));
    Arc::new(ApiClient::new(config, store, coordinator).expect("client"))
}

fn expired_pair() -> CredentialPair {
    CredentialPair {
        access_token: "expired-access".to_string(),
        refresh_token: "refresh-0".to_string(),
        expires_at: Utc::now() - Duration::seconds(1),
    }
}

#[tokio::test]
async fn test_rejected_request_refreshes_and_retries_once() {
    let (backend, config) = spawn_backend("access-1").await;
    let store = Arc::new(MemoryCredentialStore::with_pair(expired_pair()));
    let client = build_client(&config, Arc::clone(&store));

    let body: serde_json::Value = client
        .send(ApiRequest::get("/protected"))
        .await
        .expect("retried request succeeds");

    assert_eq!(body["ok"], json!(true));
    assert_eq!(backend.refresh_calls.load(Ordering::SeqCst), 1);
    // One rejected attempt plus one retried attempt.
    assert_eq!(backend.protected_calls.load(Ordering::SeqCst), 2);
    assert_eq!(store.read().expect("pair").access_token, "access-1");
}

#[tokio::test]
async fn test_concurrent_rejections_share_one_refresh() {
    let (backend, config) = spawn_backend("access-1").await;
    let store = Arc::new(MemoryCredentialStore::with_pair(expired_pair()));
    let client = build_client(&config, store);

    let results = futures::future::join_all((0..6).map(|_| {
        let client = Arc::clone(&client);
        async move {
            client
                .send::<serde_json::Value>(ApiRequest::get("/protected"))
                .await
        }
    }))
    .await;

    assert!(results.iter().all(|r| r.is_ok()));
    assert_eq!(backend.refresh_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_second_rejection_surfaces_unauthorized() {
    let (backend, config) = spawn_backend("access-1").await;
    let store = Arc::new(MemoryCredentialStore::with_pair(expired_pair()));
    let client = build_client(&config, store);

    let err = client
        .send::<serde_json::Value>(ApiRequest::get("/locked"))
        .await
        .expect_err("locked endpoint rejects the retry too");

    assert_eq!(err.kind, ErrorKind::Unauthorized);
    assert_eq!(err.status, 401);
    // The refresh itself succeeded; it just did not help.
    assert_eq!(backend.refresh_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_skip_auth_request_never_triggers_refresh() {
    let (backend, config) = spawn_backend("access-1").await;
    let store = Arc::new(MemoryCredentialStore::with_pair(expired_pair()));
    let client = build_client(&config, store);

    let body: serde_json::Value = client
        .send(ApiRequest::get("/ping").skip_auth())
        .await
        .expect("public endpoint");

    assert_eq!(body["pong"], json!(true));
    assert_eq!(backend.refresh_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_validation_rejection_carries_code_and_details() {
    let (_backend, config) = spawn_backend("access-1").await;
    let store = Arc::new(MemoryCredentialStore::with_pair(CredentialPair {
        access_token: "access-1".to_string(),
        refresh_token: "refresh-0".to_string(),
        expires_at: Utc::now() + Duration::minutes(15),
    }));
    let client = build_client(&config, store);

    let err = client
        .send::<serde_json::Value>(ApiRequest::post("/invalid"))
        .await
        .expect_err("validation failure");

    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(err.status, 422);
    assert_eq!(err.message, "Validation failed");
    assert_eq!(err.code.as_deref(), Some("VALIDATION_ERROR"));
    assert!(err.details.is_some());
}

#[tokio::test]
async fn test_unreachable_server_maps_to_network_error() {
    // Nothing listens on this port.
    let config = ApiConfig {
        base_url: "http://127.0.0.1:9/api/v1".to_string(),
        timeout_seconds: 2,
    };
    let store = Arc::new(MemoryCredentialStore::new());
    let client = build_client(&config, store);

    let err = client
        .send::<serde_json::Value>(ApiRequest::get("/ping").skip_auth())
        .await
        .expect_err("unreachable");

    assert_eq!(err.kind, ErrorKind::NetworkUnreachable);
    assert_eq!(err.status, 0);
}
