//! `/sessions` CRUD and bulk owner invalidation, ported from the original
//! companion's `SessionsCtrl`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use authproxy_core::models::{NewSession, Session};

use crate::error::HttpError;
use crate::state::AppState;

pub async fn find(State(state): State<AppState>) -> Result<Json<Vec<Session>>, HttpError> {
    Ok(Json(state.sessions.find().await?))
}

pub async fn find_by_token(State(state): State<AppState>, Path(token): Path<String>) -> Result<Json<Session>, HttpError> {
    Ok(Json(state.sessions.find_by_token(&token).await?))
}

pub async fn create(State(state): State<AppState>, body: Result<Json<NewSession>, axum::extract::rejection::JsonRejection>) -> Response {
    let Json(new_session) = match body {
        Ok(body) => body,
        Err(err) => return HttpError::body_decoding(err.to_string()).into_response(),
    };

    match state.sessions.create(new_session).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(err) => HttpError::from(err).into_response(),
    }
}

pub async fn delete_by_token(State(state): State<AppState>, Path(token): Path<String>) -> Result<Json<Session>, HttpError> {
    Ok(Json(state.sessions.delete_by_token(&token).await?))
}

#[derive(Debug, Default, Deserialize)]
pub struct OwnerTokensQuery {
    #[serde(rename = "ownerTokens")]
    owner_tokens: Option<String>,
}

/// `DELETE /sessions?ownerTokens=["a","b"]` — bulk-invalidate every live
/// session owned by one of the listed tokens. A missing or malformed
/// `ownerTokens` query parameter is a `400`, matching the original
/// companion's JSON-array parsing of the same parameter.
pub async fn delete_by_owner_tokens(State(state): State<AppState>, Query(query): Query<OwnerTokensQuery>) -> Response {
    let raw = query.owner_tokens.unwrap_or_default();
    let owners: Vec<String> = match serde_json::from_str(&raw) {
        Ok(owners) => owners,
        Err(err) => return HttpError::body_decoding(err.to_string()).into_response(),
    };

    match state.sessions.delete_by_owner_tokens(&owners).await {
        Ok(deleted) => Json(deleted).into_response(),
        Err(err) => HttpError::from(err).into_response(),
    }
}
