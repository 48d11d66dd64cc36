//! `/auth` and `/redirect`: the two endpoints nginx's `auth_request` and
//! `error_page` directives call into.
//!
//! Ported from the original companion's `AuthCtrl`. The access token and
//! the requested URL are both read from a header first, then overridable by
//! a query parameter — `/auth` additionally allows a cookie as the lowest
//! precedence source for the token.

use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;

use authproxy_core::error::AuthError;

use crate::error::HttpError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AuthQuery {
    #[serde(rename = "accessToken")]
    access_token: Option<String>,
    #[serde(rename = "requestUrl")]
    request_url: Option<String>,
}

fn access_token(headers: &HeaderMap, query: &AuthQuery, cookies: Option<&str>) -> String {
    let mut token = cookies
        .and_then(|raw| find_cookie(raw, "access_token"))
        .unwrap_or_default();

    if let Some(header) = headers.get("Auth-Server-Token").and_then(|v| v.to_str().ok()) {
        if !header.is_empty() {
            token = header.to_owned();
        }
    }

    if let Some(t) = query.access_token.as_deref().filter(|t| !t.is_empty()) {
        token = t.to_owned();
    }

    token
}

fn request_url(headers: &HeaderMap, query: &AuthQuery) -> String {
    let mut url = headers
        .get("Request-Url")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();

    if let Some(u) = query.request_url.as_deref().filter(|u| !u.is_empty()) {
        url = u.to_owned();
    }

    url
}

fn find_cookie(raw: &str, name: &str) -> Option<String> {
    raw.split(';').find_map(|pair| {
        let (k, v) = pair.trim().split_once('=')?;
        (k == name).then(|| v.to_owned())
    })
}

/// `host[:port]`, matching the original companion's use of Go's `url.URL.Host`.
fn request_host(parsed: &url::Url) -> String {
    match (parsed.host_str(), parsed.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_owned(),
        (None, _) => String::new(),
    }
}

/// `GET /auth` — authorize `access_token` against `request_url`.
///
/// On grant: `204 No Content`, with `Auth-Server-Token` echoed and, when the
/// live session carries one, a base64 `Auth-Server-Payload` and a redacted,
/// base64-encoded `Auth-Server-Session`. On denial: `403 Forbidden`, unless
/// `grant_all` is set.
pub async fn authorize(State(state): State<AppState>, headers: HeaderMap, Query(query): Query<AuthQuery>) -> Response {
    let token = access_token(&headers, &query, headers.get("Cookie").and_then(|v| v.to_str().ok()));
    let url = request_url(&headers, &query);

    let parsed = match url::Url::parse(&url) {
        Ok(u) => u,
        Err(err) => return HttpError::internal(err.to_string()).into_response(),
    };
    let host = request_host(&parsed);
    let path = parsed.path();

    let verdict = match state.auth.authorize_token(&host, path, &token).await {
        Ok(verdict) => verdict,
        Err(AuthError::ResourceNotFound { .. }) => authproxy_core::Verdict {
            granted: false,
            session: None,
        },
        Err(err) => return HttpError::from(err).into_response(),
    };

    if !verdict.granted && !state.grant_all {
        return HttpError::unauthorized("session not found, expired or unauthorized access").into_response();
    }

    let mut response_headers = HeaderMap::new();

    if let Some(session) = &verdict.session {
        if let Some(payload) = &session.payload {
            if let Ok(value) = HeaderValue::from_str(&BASE64.encode(payload)) {
                response_headers.insert("Auth-Server-Payload", value);
            }
        }

        let redacted = session.redacted();
        if let Ok(encoded) = serde_json::to_vec(&redacted) {
            if let Ok(value) = HeaderValue::from_str(&BASE64.encode(encoded)) {
                response_headers.insert("Auth-Server-Session", value);
            }
        }
    }

    if !token.is_empty() {
        if let Ok(value) = HeaderValue::from_str(&token) {
            response_headers.insert("Auth-Server-Token", value);
        }
    }

    (StatusCode::NO_CONTENT, response_headers).into_response()
}

/// `GET /redirect` — `307` to the resource's configured redirect URL, or the
/// server default, echoing the requested URL as both a query parameter and
/// the `Redirect-Url` header.
pub async fn redirect(State(state): State<AppState>, headers: HeaderMap, Query(query): Query<AuthQuery>) -> Response {
    let url = request_url(&headers, &query);

    let parsed = match url::Url::parse(&url) {
        Ok(u) => u,
        Err(err) => return HttpError::internal(err.to_string()).into_response(),
    };
    let host = request_host(&parsed);

    let redirect_url = match state.auth.get_redirect_url(&host).await {
        Ok(Some(url)) if !url.is_empty() => url,
        Ok(_) => state.default_redirect_url.clone(),
        Err(AuthError::ResourceNotFound { .. }) => state.default_redirect_url.clone(),
        Err(err) => return HttpError::from(err).into_response(),
    };

    let mut response_headers = HeaderMap::new();
    let location = format!("{redirect_url}?redirectUrl={url}");
    if let Ok(value) = HeaderValue::from_str(&location) {
        response_headers.insert(axum::http::header::LOCATION, value);
    }
    if let Ok(value) = HeaderValue::from_str(&url) {
        response_headers.insert("Redirect-Url", value);
    }

    (StatusCode::TEMPORARY_REDIRECT, response_headers).into_response()
}
