//! Structural and referential-integrity validation.
//!
//! Each entity gets `validate_creation` / `validate_update` / `validate_deletion`.
//! Uniqueness and existence checks that require reading the store run
//! concurrently via `tokio::join!`, mirroring the original companion's
//! two-goroutine validation fan-out.

use crate::error::{RepositoryError, ValidationError};
use crate::models::{Policy, Resource, Session};
use crate::repository::{PoliciesRepository, ResourcesRepository, SessionsRepository};

pub struct ResourcesValidator {
    resources: ResourcesRepository,
}

impl ResourcesValidator {
    #[must_use]
    pub fn new(resources: ResourcesRepository) -> Self {
        Self { resources }
    }

    pub async fn validate_creation(&self, resource: &Resource) -> Result<(), ValidationError> {
        if resource.name.is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }
        if resource.hostname.is_empty() {
            return Err(ValidationError::Empty { field: "hostname" });
        }

        let (name_taken, hostname_taken) = tokio::join!(
            self.resources.exists_by_name(&resource.name),
            self.resources.find_by_hostname(&resource.hostname)
        );

        if name_taken.map_err(repo_err)? {
            return Err(ValidationError::NotUnique {
                field: "name",
                value: resource.name.clone(),
            });
        }
        if hostname_taken.map_err(repo_err)?.is_some() {
            return Err(ValidationError::NotUnique {
                field: "hostname",
                value: resource.hostname.clone(),
            });
        }
        Ok(())
    }

    /// `hostname` is the key of the resource being updated — its own record
    /// is excluded from the name-uniqueness scan so keeping the same name
    /// doesn't collide with itself.
    pub async fn validate_update(&self, hostname: &str, resource: &Resource) -> Result<(), ValidationError> {
        if resource.name.is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }
        if self
            .resources
            .exists_by_name_excluding(&resource.name, hostname)
            .await
            .map_err(repo_err)?
        {
            return Err(ValidationError::NotUnique {
                field: "name",
                value: resource.name.clone(),
            });
        }
        Ok(())
    }
}

pub struct PoliciesValidator {
    policies: PoliciesRepository,
    resources: ResourcesRepository,
}

impl PoliciesValidator {
    #[must_use]
    pub fn new(policies: PoliciesRepository, resources: ResourcesRepository) -> Self {
        Self { policies, resources }
    }

    pub async fn validate_creation(&self, policy: &Policy) -> Result<(), ValidationError> {
        if policy.name.is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }
        if policy.permissions.is_none() {
            return Err(ValidationError::Empty { field: "permissions" });
        }

        let (name_taken, references_ok) =
            tokio::join!(self.policies.exists(&policy.name), self.validate_references(policy));

        if name_taken.map_err(repo_err)? {
            return Err(ValidationError::NotUnique {
                field: "name",
                value: policy.name.clone(),
            });
        }
        references_ok?;
        Ok(())
    }

    pub async fn validate_update(&self, policy: &Policy) -> Result<(), ValidationError> {
        if policy.permissions.is_none() {
            return Err(ValidationError::Empty { field: "permissions" });
        }
        self.validate_references(policy).await
    }

    pub fn validate_deletion(&self, policy: &Policy) -> Result<(), ValidationError> {
        if policy.name == "guest" {
            return Err(ValidationError::GuestPolicyProtected);
        }
        Ok(())
    }

    async fn validate_references(&self, policy: &Policy) -> Result<(), ValidationError> {
        for permission in policy.effective_permissions() {
            if permission.resource == "*" {
                continue;
            }
            let exists = self
                .resources
                .exists_by_name(&permission.resource)
                .await
                .map_err(repo_err)?;
            if !exists {
                return Err(ValidationError::DanglingReference {
                    reference: "resource",
                    name: permission.resource.clone(),
                });
            }
        }
        Ok(())
    }
}

pub struct SessionsValidator {
    sessions: SessionsRepository,
    policies: PoliciesRepository,
}

impl SessionsValidator {
    #[must_use]
    pub fn new(sessions: SessionsRepository, policies: PoliciesRepository) -> Self {
        Self { sessions, policies }
    }

    pub async fn validate_creation(&self, session: &Session, token: Option<&str>) -> Result<(), ValidationError> {
        if session.policies.is_none() {
            return Err(ValidationError::Empty { field: "policies" });
        }

        let (token_unique, policies_exist) = tokio::join!(self.validate_token_uniqueness(token), self.validate_policy_existence(session));

        token_unique?;
        policies_exist?;
        Ok(())
    }

    async fn validate_token_uniqueness(&self, token: Option<&str>) -> Result<(), ValidationError> {
        let Some(token) = token else {
            return Ok(());
        };
        if self.sessions.exists(token).await.map_err(repo_err)? {
            return Err(ValidationError::NotUnique {
                field: "token",
                value: token.to_owned(),
            });
        }
        Ok(())
    }

    async fn validate_policy_existence(&self, session: &Session) -> Result<(), ValidationError> {
        for name in session.policy_names() {
            if !self.policies.exists(name).await.map_err(repo_err)? {
                return Err(ValidationError::DanglingReference {
                    reference: "policy",
                    name: name.clone(),
                });
            }
        }
        Ok(())
    }
}

fn repo_err(err: RepositoryError) -> ValidationError {
    ValidationError::Other(err.to_string())
}
