//! Core error taxonomy.
//!
//! Every component error ultimately narrows to one of three kinds —
//! [`NotFound`](AppError::NotFound), [`Validation`](AppError::Validation),
//! [`Database`](AppError::Database) — which the server crate maps onto HTTP
//! status codes. Component-specific enums carry the detail that `tracing`
//! needs; the HTTP layer never sees more than the kind.

use authproxy_storage::StorageError;

/// Repository-level error: a thin translation of [`StorageError`].
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("failed to decode record for key {key}: {reason}")]
    Decode { key: String, reason: String },

    #[error("failed to encode record: {reason}")]
    Encode { reason: String },
}

/// Validation failures raised before a mutation reaches a repository.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} {value:?} is already in use")]
    NotUnique { field: &'static str, value: String },

    #[error("{reference} {name:?} does not exist")]
    DanglingReference { reference: &'static str, name: String },

    #[error("the guest policy cannot be deleted")]
    GuestPolicyProtected,

    #[error("{0}")]
    Other(String),
}

/// Errors from the resources domain service.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("resource {hostname:?} not found")]
    NotFound { hostname: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("cascade into policies failed: {0}")]
    Cascade(#[from] PolicyError),
}

/// Errors from the policies domain service.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("policy {name:?} not found")]
    NotFound { name: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("cascade into sessions failed: {0}")]
    Cascade(#[from] SessionError),
}

/// Errors from the sessions domain service.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session {token:?} not found")]
    NotFound { token: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Errors from the authorization engine.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("resource {hostname:?} not found")]
    ResourceNotFound { hostname: String },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// The umbrella error kind every domain error narrows to. Used directly by
/// callers that only care about the kind (e.g. the HTTP layer).
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("database error: {0}")]
    Database(String),
}

impl From<ResourceError> for AppError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::NotFound { hostname } => Self::NotFound(format!("resource {hostname:?} not found")),
            ResourceError::Validation(e) => Self::Validation(e.to_string()),
            ResourceError::Repository(e) => Self::Database(e.to_string()),
            ResourceError::Cascade(e) => Self::from(e),
        }
    }
}

impl From<PolicyError> for AppError {
    fn from(err: PolicyError) -> Self {
        match err {
            PolicyError::NotFound { name } => Self::NotFound(format!("policy {name:?} not found")),
            PolicyError::Validation(e) => Self::Validation(e.to_string()),
            PolicyError::Repository(e) => Self::Database(e.to_string()),
            PolicyError::Cascade(e) => Self::from(e),
        }
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound { token } => Self::NotFound(format!("session {token:?} not found")),
            SessionError::Validation(e) => Self::Validation(e.to_string()),
            SessionError::Repository(e) => Self::Database(e.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::ResourceNotFound { hostname } => Self::NotFound(format!("resource {hostname:?} not found")),
            AuthError::Repository(e) => Self::Database(e.to_string()),
        }
    }
}
