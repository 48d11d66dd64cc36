//! `/resources` CRUD, ported from the original companion's `ResourcesCtrl`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use authproxy_core::models::Resource;

use crate::error::HttpError;
use crate::state::AppState;

pub async fn find(State(state): State<AppState>) -> Result<Json<Vec<Resource>>, HttpError> {
    Ok(Json(state.resources.find().await?))
}

pub async fn find_by_hostname(State(state): State<AppState>, Path(hostname): Path<String>) -> Result<Json<Resource>, HttpError> {
    Ok(Json(state.resources.find_by_hostname(&hostname).await?))
}

pub async fn create(State(state): State<AppState>, body: Result<Json<Resource>, axum::extract::rejection::JsonRejection>) -> Response {
    let Json(resource) = match body {
        Ok(body) => body,
        Err(err) => return HttpError::body_decoding(err.to_string()).into_response(),
    };

    match state.resources.create(resource).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(err) => HttpError::from(err).into_response(),
    }
}

pub async fn update_by_hostname(
    State(state): State<AppState>,
    Path(hostname): Path<String>,
    body: Result<Json<Resource>, axum::extract::rejection::JsonRejection>,
) -> Response {
    let Json(resource) = match body {
        Ok(body) => body,
        Err(err) => return HttpError::body_decoding(err.to_string()).into_response(),
    };

    match state.resources.update_by_hostname(&hostname, resource).await {
        Ok(updated) => Json(updated).into_response(),
        Err(err) => HttpError::from(err).into_response(),
    }
}

pub async fn delete_by_hostname(State(state): State<AppState>, Path(hostname): Path<String>) -> Result<Json<Resource>, HttpError> {
    Ok(Json(state.resources.delete_by_hostname(&hostname).await?))
}
