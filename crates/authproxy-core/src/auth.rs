//! The authorization decision engine.
//!
//! Ported from the original companion's `AuthInter.AuthorizeToken` /
//! `checkPermissions` / `match`. Resource and session lookups run
//! concurrently; once a session is found, its policies are evaluated
//! concurrently with cancellation of the remaining evaluations as soon as
//! one grants access.

use futures::stream::FuturesUnordered;
use futures::StreamExt;

use crate::error::AuthError;
use crate::models::{Policy, Session};
use crate::repository::{PoliciesRepository, ResourcesRepository, SessionsRepository};

pub struct AuthEngine {
    resources: ResourcesRepository,
    sessions: SessionsRepository,
    policies: PoliciesRepository,
}

/// Outcome of an authorization check.
pub struct Verdict {
    pub granted: bool,
    pub session: Option<Session>,
}

impl AuthEngine {
    #[must_use]
    pub fn new(resources: ResourcesRepository, sessions: SessionsRepository, policies: PoliciesRepository) -> Self {
        Self {
            resources,
            sessions,
            policies,
        }
    }

    /// Decide whether `token` may access `path` on `hostname`.
    pub async fn authorize_token(&self, hostname: &str, path: &str, token: &str) -> Result<Verdict, AuthError> {
        let (resource, session) = tokio::join!(
            self.resources.find_by_hostname(hostname),
            self.sessions.find_by_token(token)
        );

        let resource = resource?.ok_or_else(|| AuthError::ResourceNotFound {
            hostname: hostname.to_owned(),
        })?;

        if resource.is_public() {
            return Ok(Verdict {
                granted: true,
                session: None,
            });
        }

        let session = match session? {
            Some(session) if session.is_live(chrono::Utc::now()) => session,
            _ => {
                let granted = match self.policies.find_by_name("guest").await? {
                    Some(guest) => evaluate_policy(&guest, path, &resource.name),
                    None => false,
                };
                return Ok(Verdict { granted, session: None });
            }
        };

        let granted = self.evaluate_session_policies(&session, path, &resource.name).await?;
        Ok(Verdict {
            granted,
            session: granted.then_some(session),
        })
    }

    /// Evaluate every policy named on `session` concurrently, returning as
    /// soon as one grants, once all deny, or as soon as one errors.
    async fn evaluate_session_policies(&self, session: &Session, path: &str, resource_name: &str) -> Result<bool, AuthError> {
        let mut pending = FuturesUnordered::new();
        for name in session.policy_names() {
            let name = name.clone();
            let path = path.to_owned();
            let resource_name = resource_name.to_owned();
            pending.push(async move {
                let policy = self.policies.find_by_name(&name).await?;
                Ok::<bool, AuthError>(match policy {
                    Some(policy) => evaluate_policy(&policy, &path, &resource_name),
                    None => false,
                })
            });
        }

        while let Some(result) = pending.next().await {
            if result? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Resolve the redirect URL configured on a resource, if any.
    pub async fn get_redirect_url(&self, hostname: &str) -> Result<Option<String>, AuthError> {
        let resource = self
            .resources
            .find_by_hostname(hostname)
            .await?
            .ok_or_else(|| AuthError::ResourceNotFound {
                hostname: hostname.to_owned(),
            })?;
        Ok(resource.redirect_url)
    }
}

/// Segments of a request or permission path, normalized the way the
/// original companion does: strip one leading and one trailing `/`, then
/// split on `/`.
fn split_path(path: &str) -> Vec<&str> {
    path.trim_start_matches('/').trim_end_matches('/').split('/').collect()
}

enum Match {
    None,
    Exact,
    Wildcard,
}

/// Compare a permission path against a request path. `Exact` and
/// `Wildcard` both mean "matches"; the distinction feeds the tie-break in
/// [`evaluate_policy`].
fn match_path(req_segments: &[&str], perm_segments: &[&str]) -> Match {
    if perm_segments.len() > req_segments.len() {
        return Match::None;
    }

    for (i, perm_segment) in perm_segments.iter().enumerate() {
        if *perm_segment == "*" {
            return Match::Wildcard;
        }
        if *perm_segment != req_segments[i] {
            return Match::None;
        }
        if i == perm_segments.len() - 1 && perm_segments.len() < req_segments.len() {
            return Match::None;
        }
    }

    Match::Exact
}

/// Decide whether `policy` grants access to `path` on `resource_name`.
fn evaluate_policy(policy: &Policy, path: &str, resource_name: &str) -> bool {
    if !policy.is_enabled() {
        return false;
    }

    let req_segments = split_path(path);
    let req_weight = req_segments.len();

    let mut granted = false;
    let mut max_weight = 0usize;
    let mut last_was_wildcard = false;

    for permission in policy.effective_permissions() {
        if permission.resource != resource_name && permission.resource != "*" {
            continue;
        }
        if !permission.is_enabled() {
            continue;
        }

        for path_pattern in permission.effective_paths() {
            let perm_segments = split_path(path_pattern);
            let perm_weight = perm_segments.len();
            if perm_weight > req_weight {
                continue;
            }

            let (matched, via_wildcard) = match match_path(&req_segments, &perm_segments) {
                Match::None => continue,
                Match::Exact => (true, false),
                Match::Wildcard => (true, true),
            };

            if !matched {
                continue;
            }

            let is_better = perm_weight > max_weight || (perm_weight == max_weight && last_was_wildcard);
            if is_better {
                granted = !permission.is_deny();
                max_weight = perm_weight;
                last_was_wildcard = via_wildcard;
            }
        }
    }

    granted
}
