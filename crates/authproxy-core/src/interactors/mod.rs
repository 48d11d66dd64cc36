//! Domain services: CRUD with cascade, session generation and expiry.
//!
//! Resources, policies and sessions form a one-directional cascade
//! (resource deletion strips policy permissions; policy deletion strips
//! session references). Each deleting interactor depends on the *next*
//! interactor only through a narrow capability trait, so the two services
//! never depend on each other's full type.

use crate::error::{PolicyError, SessionError};
use crate::models::{Policy, Resource};

mod policies;
mod resources;
mod sessions;

pub use policies::PoliciesInteractor;
pub use resources::ResourcesInteractor;
pub use sessions::SessionsInteractor;

/// Capability needed by [`ResourcesInteractor`] to strip dangling
/// permissions out of every policy after a resource is deleted.
#[async_trait::async_trait]
pub trait PolicyCascade: Send + Sync {
    async fn delete_cascade(&self, resource: &Resource) -> Result<(), PolicyError>;
}

/// Capability needed by [`PoliciesInteractor`] to strip dangling policy
/// references out of every session after a policy is deleted.
#[async_trait::async_trait]
pub trait SessionCascade: Send + Sync {
    async fn delete_cascade(&self, policy: &Policy) -> Result<(), SessionError>;
}
