//! Middleware-level exercises: redirects, cookie rotation, and cookie
//! clearing as observed on real HTTP responses.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::routing::get;
use http::{Request, StatusCode, header};
use tower::ServiceExt;

use wirechat_auth::credentials::TokenGrant;
use wirechat_auth::refresher::TokenRefresher;
use wirechat_core::config::{AuthConfig, EdgeConfig};
use wirechat_core::error::AppError;
use wirechat_edge::{AdmissionFilter, EdgeState, admission_middleware};

struct MockRefresher {
    fail: bool,
}

#[async_trait]
impl TokenRefresher for MockRefresher {
    async fn refresh(&self, _refresh_token: &str) -> Result<TokenGrant, AppError> {
        if self.fail {
            Err(AppError::unauthorized("Invalid refresh token"))
        } else {
            Ok(TokenGrant {
                access_token: "rotated-access".to_string(),
                refresh_token: "rotated-refresh".to_string(),
                expires_in: 900,
                token_type: "Bearer".to_string(),
            })
        }
    }
}

fn app(fail_refresh: bool) -> Router {
    let auth = AuthConfig::default();
    let edge = EdgeConfig::default();
    let filter = Arc::new(AdmissionFilter::new(
        &edge,
        &auth,
        Arc::new(MockRefresher { fail: fail_refresh }),
    ));
    let state = EdgeState { filter, auth, edge };

    Router::new()
        .route("/", get(|| async { "home" }))
        .route("/login", get(|| async { "login" }))
        .route("/conversations", get(|| async { "conversations" }))
        .route("/conversations/{id}", get(|| async { "conversation" }))
        .layer(axum::middleware::from_fn_with_state(
            state,
            admission_middleware,
        ))
}

fn request(path: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("request")
}

fn set_cookies(response: &http::Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok().map(str::to_string))
        .collect()
}

#[tokio::test]
async fn test_protected_without_credentials_redirects_to_login() {
    let response = app(false)
        .oneshot(request("/conversations/42", None))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = response.headers()[header::LOCATION]
        .to_str()
        .expect("location");
    assert_eq!(location, "/login?callbackUrl=%2Fconversations%2F42");
}

#[tokio::test]
async fn test_public_path_passes_through() {
    let response = app(false)
        .oneshot(request("/", None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookies(&response).is_empty());
}

#[tokio::test]
async fn test_refresh_success_rotates_cookies_and_continues() {
    // No access cookie, live refresh cookie, protected path.
    let response = app(false)
        .oneshot(request(
            "/conversations",
            Some("chat_refreshToken=live-refresh"),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 2);
    assert!(
        cookies
            .iter()
            .any(|c| c.starts_with("chat_accessToken=rotated-access;"))
    );
    assert!(
        cookies
            .iter()
            .any(|c| c.starts_with("chat_refreshToken=rotated-refresh;"))
    );
}

#[tokio::test]
async fn test_refresh_failure_clears_cookies_and_redirects() {
    let response = app(true)
        .oneshot(request(
            "/conversations",
            Some("chat_refreshToken=dead-refresh"),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let cookies = set_cookies(&response);
    assert!(cookies.iter().any(|c| c.contains("chat_accessToken=;")));
    assert!(cookies.iter().any(|c| c.contains("chat_refreshToken=;")));
}
