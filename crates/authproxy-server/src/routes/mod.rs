//! HTTP routes, grouped the way the original companion groups its
//! controllers: auth/redirect, sessions, resources, policies.

pub mod auth;
pub mod health;
pub mod policies;
pub mod resources;
pub mod sessions;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/auth", get(auth::authorize))
        .route("/redirect", get(auth::redirect))
        .route("/resources", get(resources::find).post(resources::create))
        .route(
            "/resources/{hostname}",
            get(resources::find_by_hostname)
                .put(resources::update_by_hostname)
                .delete(resources::delete_by_hostname),
        )
        .route("/policies", get(policies::find).post(policies::create))
        .route(
            "/policies/{name}",
            get(policies::find_by_name)
                .put(policies::update_by_name)
                .delete(policies::delete_by_name),
        )
        .route("/sessions", get(sessions::find).post(sessions::create).delete(sessions::delete_by_owner_tokens))
        .route(
            "/sessions/{token}",
            get(sessions::find_by_token).delete(sessions::delete_by_token),
        )
        .with_state(state)
}
