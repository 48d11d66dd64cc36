//! Sessions domain service.
//!
//! Grounded on the original companion's `SessionsInter`: listing/lookup
//! silently skip expired sessions, deletion is a soft delete (`valid_to`
//! set to now), and bulk owner invalidation returns the list it touched.

use chrono::{Duration, Utc};

use crate::error::SessionError;
use crate::models::{NewSession, Policy, Session};
use crate::repository::SessionsRepository;
use crate::token;
use crate::validators::SessionsValidator;

use super::SessionCascade;

pub struct SessionsInteractor {
    repository: SessionsRepository,
    validator: SessionsValidator,
    default_validity: Duration,
    default_token_len: usize,
}

impl SessionsInteractor {
    #[must_use]
    pub fn new(
        repository: SessionsRepository,
        validator: SessionsValidator,
        default_validity: Duration,
        default_token_len: usize,
    ) -> Self {
        Self {
            repository,
            validator,
            default_validity,
            default_token_len,
        }
    }

    /// Every session whose `valid_to` is still in the future.
    pub async fn find(&self) -> Result<Vec<Session>, SessionError> {
        let now = Utc::now();
        Ok(self
            .repository
            .find_all_raw()
            .await?
            .into_iter()
            .filter(|s| s.is_live(now))
            .collect())
    }

    /// A single live session, or `NotFound` if absent or expired.
    pub async fn find_by_token(&self, token: &str) -> Result<Session, SessionError> {
        let session = self
            .repository
            .find_by_token(token)
            .await?
            .ok_or_else(|| SessionError::NotFound { token: token.to_owned() })?;
        if !session.is_live(Utc::now()) {
            return Err(SessionError::NotFound { token: token.to_owned() });
        }
        Ok(session)
    }

    pub async fn create(&self, new_session: NewSession) -> Result<Session, SessionError> {
        let session = self.fill_defaults(new_session);
        self.validator
            .validate_creation(&session, Some(session.token.as_str()))
            .await?;
        self.repository.put(&session).await?;
        Ok(session)
    }

    fn fill_defaults(&self, new_session: NewSession) -> Session {
        let now = Utc::now();
        Session {
            token: new_session.token.unwrap_or_else(|| token::generate(self.default_token_len)),
            created: now,
            valid_to: new_session.valid_to.unwrap_or(now + self.default_validity),
            owner_token: new_session.owner_token,
            agent: new_session.agent,
            policies: new_session.policies,
            payload: new_session.payload,
        }
    }

    /// Soft-delete a live session by setting `valid_to` to now.
    pub async fn delete_by_token(&self, token: &str) -> Result<Session, SessionError> {
        let mut session = self.find_by_token(token).await?;
        session.valid_to = Utc::now();
        self.repository.put(&session).await?;
        Ok(session)
    }

    /// Soft-delete every live session whose `owner_token` is in `owners`,
    /// returning the sessions that were deleted.
    pub async fn delete_by_owner_tokens(&self, owners: &[String]) -> Result<Vec<Session>, SessionError> {
        let now = Utc::now();
        let mut deleted = Vec::new();
        for mut session in self.repository.find_all_raw().await? {
            if !session.is_live(now) {
                continue;
            }
            let matches = session
                .owner_token
                .as_ref()
                .is_some_and(|owner| owners.iter().any(|o| o == owner));
            if matches {
                session.valid_to = now;
                self.repository.put(&session).await?;
                deleted.push(session);
            }
        }
        Ok(deleted)
    }
}

#[async_trait::async_trait]
impl SessionCascade for SessionsInteractor {
    async fn delete_cascade(&self, policy: &Policy) -> Result<(), SessionError> {
        for mut session in self.repository.find_all_raw().await? {
            let Some(policies) = session.policies.as_mut() else {
                continue;
            };
            let before = policies.len();
            policies.retain(|name| name != &policy.name);
            if policies.len() != before {
                self.repository.put(&session).await?;
            }
        }
        Ok(())
    }
}
