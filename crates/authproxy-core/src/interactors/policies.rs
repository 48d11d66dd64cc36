//! Policies domain service.
//!
//! Grounded on the original companion's `PoliciesInter`: name is the store
//! key and is immutable across updates. Deletion validates first (the
//! `guest` policy is protected), deletes, then cascades into sessions.

use std::sync::Arc;

use crate::error::PolicyError;
use crate::models::{Policy, Resource};
use crate::repository::PoliciesRepository;
use crate::validators::PoliciesValidator;

use super::{PolicyCascade, SessionCascade};

pub struct PoliciesInteractor {
    repository: PoliciesRepository,
    validator: PoliciesValidator,
    session_cascade: Arc<dyn SessionCascade>,
}

impl PoliciesInteractor {
    #[must_use]
    pub fn new(repository: PoliciesRepository, validator: PoliciesValidator, session_cascade: Arc<dyn SessionCascade>) -> Self {
        Self {
            repository,
            validator,
            session_cascade,
        }
    }

    pub async fn find(&self) -> Result<Vec<Policy>, PolicyError> {
        Ok(self.repository.find().await?)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Policy, PolicyError> {
        self.repository
            .find_by_name(name)
            .await?
            .ok_or_else(|| PolicyError::NotFound { name: name.to_owned() })
    }

    pub async fn create(&self, policy: Policy) -> Result<Policy, PolicyError> {
        self.validator.validate_creation(&policy).await?;
        self.repository.create(&policy).await?;
        Ok(policy)
    }

    pub async fn update_by_name(&self, name: &str, mut policy: Policy) -> Result<Policy, PolicyError> {
        let existing = self.find_by_name(name).await?;
        self.validator.validate_update(&policy).await?;
        policy.name = existing.name;
        self.repository.create(&policy).await?;
        Ok(policy)
    }

    pub async fn delete_by_name(&self, name: &str) -> Result<Policy, PolicyError> {
        let policy = self.find_by_name(name).await?;
        self.validator.validate_deletion(&policy)?;
        self.repository.delete_by_name(name).await?;
        self.session_cascade.delete_cascade(&policy).await?;
        Ok(policy)
    }

    /// Strip every permission referencing `resource` from every policy.
    pub async fn delete_cascade_by_resource(&self, resource: &Resource) -> Result<(), PolicyError> {
        for mut policy in self.repository.find().await? {
            let Some(permissions) = policy.permissions.as_mut() else {
                continue;
            };
            let before = permissions.len();
            permissions.retain(|p| p.resource != resource.name);
            if permissions.len() != before {
                self.repository.create(&policy).await?;
            }
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl PolicyCascade for PoliciesInteractor {
    async fn delete_cascade(&self, resource: &Resource) -> Result<(), PolicyError> {
        self.delete_cascade_by_resource(resource).await
    }
}
