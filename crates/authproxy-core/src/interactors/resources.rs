//! Resources domain service.
//!
//! Grounded on the original companion's `ResourcesInter`: hostname is the
//! store key and is immutable across updates; deletion cascades into
//! policies only after the record itself is gone.

use std::sync::Arc;

use crate::error::ResourceError;
use crate::models::Resource;
use crate::repository::ResourcesRepository;
use crate::validators::ResourcesValidator;

use super::PolicyCascade;

pub struct ResourcesInteractor {
    repository: ResourcesRepository,
    validator: ResourcesValidator,
    policy_cascade: Arc<dyn PolicyCascade>,
}

impl ResourcesInteractor {
    #[must_use]
    pub fn new(repository: ResourcesRepository, validator: ResourcesValidator, policy_cascade: Arc<dyn PolicyCascade>) -> Self {
        Self {
            repository,
            validator,
            policy_cascade,
        }
    }

    pub async fn find(&self) -> Result<Vec<Resource>, ResourceError> {
        Ok(self.repository.find().await?)
    }

    pub async fn find_by_hostname(&self, hostname: &str) -> Result<Resource, ResourceError> {
        self.repository
            .find_by_hostname(hostname)
            .await?
            .ok_or_else(|| ResourceError::NotFound {
                hostname: hostname.to_owned(),
            })
    }

    pub async fn create(&self, resource: Resource) -> Result<Resource, ResourceError> {
        self.validator.validate_creation(&resource).await?;
        self.repository.create(&resource).await?;
        Ok(resource)
    }

    pub async fn update_by_hostname(&self, hostname: &str, mut resource: Resource) -> Result<Resource, ResourceError> {
        let existing = self.find_by_hostname(hostname).await?;
        self.validator.validate_update(hostname, &resource).await?;
        resource.hostname = existing.hostname;
        self.repository.create(&resource).await?;
        Ok(resource)
    }

    pub async fn delete_by_hostname(&self, hostname: &str) -> Result<Resource, ResourceError> {
        let resource = self.find_by_hostname(hostname).await?;
        self.repository.delete_by_hostname(hostname).await?;
        self.policy_cascade.delete_cascade(&resource).await?;
        Ok(resource)
    }
}
