//! Typed repositories over the raw [`Store`] buckets.
//!
//! Each repository owns JSON encoding/decoding for its record type and
//! narrows [`StorageError`] into [`RepositoryError`]. Interactors never talk
//! to the store directly.

use authproxy_storage::{Store, POLICIES, RESOURCES, SESSIONS};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::RepositoryError;
use crate::models::{Policy, Resource, Session};

fn encode<T: Serialize>(value: &T) -> Result<String, RepositoryError> {
    serde_json::to_string(value).map_err(|err| RepositoryError::Encode { reason: err.to_string() })
}

fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T, RepositoryError> {
    serde_json::from_str(raw).map_err(|err| RepositoryError::Decode {
        key: key.to_owned(),
        reason: err.to_string(),
    })
}

/// Repository over the `resources` bucket, keyed by hostname.
#[derive(Clone)]
pub struct ResourcesRepository {
    store: Store,
}

impl ResourcesRepository {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn find(&self) -> Result<Vec<Resource>, RepositoryError> {
        let rows = self.store.list(RESOURCES).await?;
        rows.iter().map(|(k, v)| decode(k, v)).collect()
    }

    pub async fn find_by_hostname(&self, hostname: &str) -> Result<Option<Resource>, RepositoryError> {
        match self.store.get(RESOURCES, hostname).await? {
            Some(raw) => Ok(Some(decode(hostname, &raw)?)),
            None => Ok(None),
        }
    }

    pub async fn exists_by_name(&self, name: &str) -> Result<bool, RepositoryError> {
        Ok(self.find().await?.iter().any(|r| r.name == name))
    }

    /// Like [`Self::exists_by_name`], but ignores the resource keyed by
    /// `excluding_hostname` — used on update so a resource that keeps its
    /// own name isn't flagged as colliding with itself.
    pub async fn exists_by_name_excluding(&self, name: &str, excluding_hostname: &str) -> Result<bool, RepositoryError> {
        Ok(self
            .find()
            .await?
            .iter()
            .any(|r| r.name == name && r.hostname != excluding_hostname))
    }

    pub async fn create(&self, resource: &Resource) -> Result<(), RepositoryError> {
        let raw = encode(resource)?;
        self.store.put(RESOURCES, &resource.hostname, &raw).await?;
        Ok(())
    }

    pub async fn delete_by_hostname(&self, hostname: &str) -> Result<(), RepositoryError> {
        self.store.delete(RESOURCES, hostname).await?;
        Ok(())
    }
}

/// Repository over the `policies` bucket, keyed by name.
#[derive(Clone)]
pub struct PoliciesRepository {
    store: Store,
}

impl PoliciesRepository {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn find(&self) -> Result<Vec<Policy>, RepositoryError> {
        let rows = self.store.list(POLICIES).await?;
        rows.iter().map(|(k, v)| decode(k, v)).collect()
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Policy>, RepositoryError> {
        match self.store.get(POLICIES, name).await? {
            Some(raw) => Ok(Some(decode(name, &raw)?)),
            None => Ok(None),
        }
    }

    pub async fn exists(&self, name: &str) -> Result<bool, RepositoryError> {
        Ok(self.store.get(POLICIES, name).await?.is_some())
    }

    pub async fn create(&self, policy: &Policy) -> Result<(), RepositoryError> {
        let raw = encode(policy)?;
        self.store.put(POLICIES, &policy.name, &raw).await?;
        Ok(())
    }

    pub async fn delete_by_name(&self, name: &str) -> Result<(), RepositoryError> {
        self.store.delete(POLICIES, name).await?;
        Ok(())
    }
}

/// Repository over the `sessions` bucket, keyed by token.
#[derive(Clone)]
pub struct SessionsRepository {
    store: Store,
}

impl SessionsRepository {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn find_all_raw(&self) -> Result<Vec<Session>, RepositoryError> {
        let rows = self.store.list(SESSIONS).await?;
        rows.iter().map(|(k, v)| decode(k, v)).collect()
    }

    pub async fn find_by_token(&self, token: &str) -> Result<Option<Session>, RepositoryError> {
        match self.store.get(SESSIONS, token).await? {
            Some(raw) => Ok(Some(decode(token, &raw)?)),
            None => Ok(None),
        }
    }

    pub async fn exists(&self, token: &str) -> Result<bool, RepositoryError> {
        Ok(self.store.get(SESSIONS, token).await?.is_some())
    }

    pub async fn put(&self, session: &Session) -> Result<(), RepositoryError> {
        let raw = encode(session)?;
        self.store.put(SESSIONS, &session.token, &raw).await?;
        Ok(())
    }

    pub async fn delete_by_token(&self, token: &str) -> Result<(), RepositoryError> {
        self.store.delete(SESSIONS, token).await?;
        Ok(())
    }
}
