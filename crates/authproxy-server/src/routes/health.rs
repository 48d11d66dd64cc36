//! Liveness probe. Not part of the original companion's API surface, but
//! every teacher-grade service in this stack exposes one for its
//! orchestrator's health checks.

use axum::http::StatusCode;

pub async fn health() -> StatusCode {
    StatusCode::OK
}
