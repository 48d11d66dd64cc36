//! HTTP-layer error mapping.
//!
//! Every domain error narrows to [`authproxy_core::error::AppError`] before
//! it reaches here; this module's only job is picking the status code and
//! `{errorCode, description}` body the original companion's API used.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use authproxy_core::error::{AppError, AuthError, PolicyError, ResourceError, SessionError};

#[derive(Debug, Serialize)]
struct ErrorBody {
    #[serde(rename = "errorCode")]
    error_code: &'static str,
    description: String,
}

/// Wraps a domain [`AppError`] with the HTTP status it maps to.
///
/// `/auth` special-cases a `NotFound` into a 403 rather than 404 — an
/// unrecognized token is an authorization failure at that endpoint, not a
/// missing resource — so it builds this type directly instead of going
/// through `From<AppError>`.
pub struct HttpError {
    status: StatusCode,
    error_code: &'static str,
    description: String,
}

impl HttpError {
    #[must_use]
    pub fn new(status: StatusCode, error_code: &'static str, description: impl Into<String>) -> Self {
        Self {
            status,
            error_code,
            description: description.into(),
        }
    }

    #[must_use]
    pub fn internal(description: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", description)
    }

    #[must_use]
    pub fn body_decoding(description: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BODY_DECODING_ERROR", description)
    }

    #[must_use]
    pub fn unauthorized(description: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "AUTHORIZATION_REQUIRED", description)
    }
}

impl From<AppError> for HttpError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            AppError::Validation(msg) => Self::new(StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", msg),
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "database error");
                Self::internal("an internal error occurred")
            }
        }
    }
}

impl From<ResourceError> for HttpError {
    fn from(err: ResourceError) -> Self {
        AppError::from(err).into()
    }
}

impl From<PolicyError> for HttpError {
    fn from(err: PolicyError) -> Self {
        AppError::from(err).into()
    }
}

impl From<SessionError> for HttpError {
    fn from(err: SessionError) -> Self {
        AppError::from(err).into()
    }
}

impl From<AuthError> for HttpError {
    fn from(err: AuthError) -> Self {
        AppError::from(err).into()
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error_code: self.error_code,
            description: self.description,
        };
        (self.status, Json(body)).into_response()
    }
}
