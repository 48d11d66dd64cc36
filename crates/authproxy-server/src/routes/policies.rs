//! `/policies` CRUD, ported from the original companion's `PoliciesCtrl`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use authproxy_core::models::Policy;

use crate::error::HttpError;
use crate::state::AppState;

pub async fn find(State(state): State<AppState>) -> Result<Json<Vec<Policy>>, HttpError> {
    Ok(Json(state.policies.find().await?))
}

pub async fn find_by_name(State(state): State<AppState>, Path(name): Path<String>) -> Result<Json<Policy>, HttpError> {
    Ok(Json(state.policies.find_by_name(&name).await?))
}

pub async fn create(State(state): State<AppState>, body: Result<Json<Policy>, axum::extract::rejection::JsonRejection>) -> Response {
    let Json(policy) = match body {
        Ok(body) => body,
        Err(err) => return HttpError::body_decoding(err.to_string()).into_response(),
    };

    match state.policies.create(policy).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(err) => HttpError::from(err).into_response(),
    }
}

pub async fn update_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Result<Json<Policy>, axum::extract::rejection::JsonRejection>,
) -> Response {
    let Json(policy) = match body {
        Ok(body) => body,
        Err(err) => return HttpError::body_decoding(err.to_string()).into_response(),
    };

    match state.policies.update_by_name(&name, policy).await {
        Ok(updated) => Json(updated).into_response(),
        Err(err) => HttpError::from(err).into_response(),
    }
}

/// Deleting the protected `guest` policy surfaces as `422`, matching the
/// original companion; every other failure follows the shared mapping.
pub async fn delete_by_name(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    match state.policies.delete_by_name(&name).await {
        Ok(deleted) => Json(deleted).into_response(),
        Err(err) => HttpError::from(err).into_response(),
    }
}
