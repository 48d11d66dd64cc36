//! HTTP surface for the auth proxy companion.
//!
//! Wires the domain services in [`authproxy_core`] to an `axum` [`Router`]:
//! `/auth` and `/redirect` for nginx's `auth_request`/`error_page`
//! directives, plus CRUD over resources, policies and sessions.

pub mod config;
pub mod error;
pub mod routes;
pub mod seed;
pub mod state;

pub use config::ServerConfig;
pub use state::AppState;

use axum::Router;

#[must_use]
pub fn build_router(state: AppState) -> Router {
    routes::router(state)
}
