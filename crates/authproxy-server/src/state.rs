//! Shared application state handed to every handler.

use std::sync::Arc;

use authproxy_core::{AuthEngine, PoliciesInteractor, ResourcesInteractor, SessionsInteractor};

use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub resources: Arc<ResourcesInteractor>,
    pub policies: Arc<PoliciesInteractor>,
    pub sessions: Arc<SessionsInteractor>,
    pub auth: Arc<AuthEngine>,
    pub default_redirect_url: String,
    pub grant_all: bool,
}

impl AppState {
    #[must_use]
    pub fn new(
        resources: Arc<ResourcesInteractor>,
        policies: Arc<PoliciesInteractor>,
        sessions: Arc<SessionsInteractor>,
        auth: Arc<AuthEngine>,
        config: &ServerConfig,
    ) -> Self {
        Self {
            resources,
            policies,
            sessions,
            auth,
            default_redirect_url: config.default_redirect_url.clone(),
            grant_all: config.grant_all,
        }
    }
}
