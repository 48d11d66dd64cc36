//! Embedded key/value storage for the auth proxy companion.
//!
//! Wraps `redb` with a bucket-oriented transaction API. The live database
//! holds `policies`, `resources`, and `sessions` buckets; the archiver opens
//! a second, structurally separate [`Store`] for the archive file.

pub mod error;
pub mod store;

pub use error::StorageError;
pub use redb::TableDefinition;
pub use store::{Store, POLICIES, RESOURCES, SESSIONS};
