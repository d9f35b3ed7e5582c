//! `axum` adapter around the admission filter.
//!
//! The middleware response is the single authoritative place where the
//! server rotates credential cookies; data-fetch paths never rotate
//! (client-side rotation belongs to the request gateway).

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use http::HeaderValue;
use http::header::SET_COOKIE;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::warn;

use wirechat_auth::credentials::TokenGrant;
use wirechat_core::config::{AuthConfig, EdgeConfig};

use crate::cookies;
use crate::filter::{Admission, AdmissionFilter};

/// Shared state for the admission middleware.
#[derive(Clone)]
pub struct EdgeState {
    /// The decision engine.
    pub filter: Arc<AdmissionFilter>,
    /// Cookie names and lifetimes.
    pub auth: AuthConfig,
    /// Redirect targets.
    pub edge: EdgeConfig,
}

/// Admission middleware, mounted with `axum::middleware::from_fn_with_state`.
pub async fn admission_middleware(
    State(state): State<EdgeState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let access = cookies::read(request.headers(), &state.auth.access_cookie);
    let refresh = cookies::read(request.headers(), &state.auth.refresh_cookie);

    match state
        .filter
        .admit(&path, access.as_deref(), refresh.as_deref())
        .await
    {
        Admission::Continue => next.run(request).await,
        Admission::Rotate(grant) => {
            let mut response = next.run(request).await;
            append_rotation(&mut response, &state.auth, &grant);
            response
        }
        Admission::RedirectToLogin {
            callback,
            clear_cookies,
        } => {
            let mut response = login_redirect(&state.edge, callback.as_deref());
            if clear_cookies {
                append_clear(&mut response, &state.auth);
            }
            response
        }
        Admission::RedirectHome => Redirect::temporary(&state.edge.home_path).into_response(),
    }
}

fn login_redirect(edge: &EdgeConfig, callback: Option<&str>) -> Response {
    let location = match callback {
        Some(path) => format!(
            "{}?{}={}",
            edge.login_path,
            edge.callback_param,
            utf8_percent_encode(path, NON_ALPHANUMERIC)
        ),
        None => edge.login_path.clone(),
    };
    Redirect::temporary(&location).into_response()
}

fn append_rotation(response: &mut Response, auth: &AuthConfig, grant: &TokenGrant) {
    let access_ttl = grant.expires_in.max(0) as u64;
    append_cookie(
        response,
        cookies::set(&auth.access_cookie, &grant.access_token, access_ttl),
    );
    append_cookie(
        response,
        cookies::set(
            &auth.refresh_cookie,
            &grant.refresh_token,
            auth.refresh_ttl_seconds,
        ),
    );
}

fn append_clear(response: &mut Response, auth: &AuthConfig) {
    append_cookie(response, cookies::clear(&auth.access_cookie));
    append_cookie(response, cookies::clear(&auth.refresh_cookie));
}

fn append_cookie(response: &mut Response, cookie: String) {
    match HeaderValue::from_str(&cookie) {
        Ok(value) => {
            response.headers_mut().append(SET_COOKIE, value);
        }
        Err(e) => warn!(error = %e, "Dropping unencodable Set-Cookie value"),
    }
}
