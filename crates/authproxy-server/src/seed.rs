//! Startup config import and guest-policy bootstrap.
//!
//! Grounded on the original companion's `ConfigImporter` and the
//! `SeedDatabase` init step: when a seed file is configured, the `resources`
//! and `policies` buckets are wiped and replaced wholesale from the file
//! (resources first, since policies may reference them); a malformed file or
//! any validation failure aborts startup rather than leaving a partial
//! import. Whether or not a seed file is configured, a `guest` policy with
//! no permissions is inserted if one isn't already present.

use std::path::Path;

use authproxy_core::models::{Policy, Resource};
use authproxy_core::{PoliciesInteractor, ResourcesInteractor};
use authproxy_storage::{Store, POLICIES, RESOURCES};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
struct SeedConfig {
    #[serde(default)]
    resources: Vec<Resource>,
    #[serde(default)]
    policies: Vec<Policy>,
}

/// Clear the `resources`/`policies` buckets and import `path` into them.
///
/// Returns an error on any I/O, parse, or validation failure — the caller
/// is expected to treat that as fatal and abort startup.
pub async fn import(
    path: &Path,
    live: &Store,
    resources: &ResourcesInteractor,
    policies: &PoliciesInteractor,
) -> anyhow::Result<()> {
    let raw = tokio::fs::read_to_string(path).await?;

    let config: SeedConfig = match path.extension().and_then(|ext| ext.to_str()) {
        Some("yml" | "yaml") => serde_yaml::from_str(&raw)?,
        Some("json") => serde_json::from_str(&raw)?,
        _ => anyhow::bail!("unsupported seed config extension: {}", path.display()),
    };

    clear_bucket(live, RESOURCES).await?;
    clear_bucket(live, POLICIES).await?;

    for resource in config.resources {
        resources.create(resource).await?;
    }
    for policy in config.policies {
        policies.create(policy).await?;
    }

    Ok(())
}

async fn clear_bucket(store: &Store, bucket: authproxy_storage::TableDefinition<'static, &'static str, &'static str>) -> anyhow::Result<()> {
    for (key, _) in store.list(bucket).await? {
        store.delete(bucket, &key).await?;
    }
    Ok(())
}

/// Insert the default `guest` policy if one doesn't already exist.
pub async fn ensure_guest_policy(policies: &PoliciesInteractor) -> anyhow::Result<()> {
    use authproxy_core::error::PolicyError;

    match policies.find_by_name("guest").await {
        Ok(_) => Ok(()),
        Err(PolicyError::NotFound { .. }) => {
            policies.create(Policy::new_guest()).await?;
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
