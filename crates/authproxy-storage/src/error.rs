//! Storage-layer error types.
//!
//! These stay close to the underlying `redb` failure modes; the core crate
//! collapses all of them into a single `DatabaseError` kind at the
//! repository boundary.

use std::path::PathBuf;

/// Errors raised by [`crate::Store`].
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to open database at {path}: {reason}")]
    Open { path: PathBuf, reason: String },

    #[error("failed to read key {key} from bucket {bucket}: {reason}")]
    Read {
        bucket: String,
        key: String,
        reason: String,
    },

    #[error("failed to write key {key} to bucket {bucket}: {reason}")]
    Write {
        bucket: String,
        key: String,
        reason: String,
    },

    #[error("failed to delete key {key} from bucket {bucket}: {reason}")]
    Delete {
        bucket: String,
        key: String,
        reason: String,
    },

    #[error("failed to list bucket {bucket}: {reason}")]
    List { bucket: String, reason: String },

    #[error("transaction failed: {reason}")]
    Transaction { reason: String },
}
