//! Data model: [`Resource`], [`Policy`], [`Permission`], [`Session`].
//!
//! Optional fields are modeled as `Option<T>`, not sentinel defaults —
//! `deny: Some(false)` and `deny: None` both mean "grant" today, but only
//! `Option` lets the matching algorithm distinguish "explicitly set" from
//! "absent" if that ever needs to matter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An access target identified by host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub hostname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
}

impl Resource {
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.public.unwrap_or(false)
    }
}

/// An allow/deny rule on a `(resource, path)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    /// Resource name this permission applies to, or `"*"` for any resource.
    pub resource: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deny: Option<bool>,
}

impl Permission {
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    #[must_use]
    pub fn is_deny(&self) -> bool {
        self.deny.unwrap_or(false)
    }

    /// Paths to match against, defaulting to `["*"]` when absent or empty.
    #[must_use]
    pub fn effective_paths(&self) -> Vec<&str> {
        match &self.paths {
            Some(paths) if !paths.is_empty() => paths.iter().map(String::as_str).collect(),
            _ => vec!["*"],
        }
    }
}

/// A named, ordered list of permissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<Permission>>,
}

impl Policy {
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    #[must_use]
    pub fn effective_permissions(&self) -> &[Permission] {
        match &self.permissions {
            Some(permissions) => permissions,
            None => &[],
        }
    }

    pub fn new_guest() -> Self {
        Self {
            name: "guest".to_owned(),
            enabled: None,
            permissions: Some(Vec::new()),
        }
    }
}

/// A token bound to a list of policies with a validity window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub created: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policies: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

impl Session {
    #[must_use]
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.valid_to > now
    }

    #[must_use]
    pub fn policy_names(&self) -> &[String] {
        match &self.policies {
            Some(policies) => policies,
            None => &[],
        }
    }

    /// A copy of this session with `policies` and `payload` nulled, as sent
    /// back to the caller in the `Auth-Server-Session` header.
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            policies: None,
            payload: None,
            ..self.clone()
        }
    }
}

/// Request shape accepted when creating a session: every auto-filled field
/// is optional on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_to: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    /// Deliberately not defaulted away on the wire: an absent/null
    /// `policies` key must reach the validator as `None` so it is rejected
    /// with a validation error, not silently treated as an empty list.
    #[serde(default)]
    pub policies: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}
