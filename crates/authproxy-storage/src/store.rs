//! Embedded transactional store backed by `redb`.
//!
//! Three buckets live in one database file: `policies`, `resources`,
//! `sessions`. Values are opaque JSON text; the core crate owns encoding.
//! Every transaction runs inside [`tokio::task::spawn_blocking`] because
//! `redb` transactions are synchronous and may block on disk I/O.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use redb::{Database, ReadTransaction, ReadableTable, TableDefinition, WriteTransaction};

use crate::error::StorageError;

pub const POLICIES: TableDefinition<'static, &str, &str> = TableDefinition::new("policies");
pub const RESOURCES: TableDefinition<'static, &str, &str> = TableDefinition::new("resources");
pub const SESSIONS: TableDefinition<'static, &str, &str> = TableDefinition::new("sessions");

const ALL_TABLES: &[TableDefinition<'static, &str, &str>] = &[POLICIES, RESOURCES, SESSIONS];

/// A transactional key/value store with the three buckets used by the
/// authorization companion.
#[derive(Clone)]
pub struct Store {
    db: Arc<Database>,
    path: PathBuf,
}

impl Store {
    /// Open (creating if absent) the database file at `path`, waiting up to
    /// `open_timeout` to acquire the file lock, and ensure every bucket
    /// exists.
    pub async fn open(path: impl Into<PathBuf>, open_timeout: Duration) -> Result<Self, StorageError> {
        let path = path.into();
        let open_path = path.clone();

        let db = tokio::task::spawn_blocking(move || -> Result<Database, StorageError> {
            let start = std::time::Instant::now();
            loop {
                match Database::create(&open_path) {
                    Ok(db) => return Ok(db),
                    Err(err) if start.elapsed() < open_timeout => {
                        tracing::warn!(path = %open_path.display(), error = %err, "database busy, retrying");
                        std::thread::sleep(Duration::from_millis(50));
                    }
                    Err(err) => {
                        return Err(StorageError::Open {
                            path: open_path,
                            reason: err.to_string(),
                        });
                    }
                }
            }
        })
        .await
        .map_err(|err| StorageError::Open {
            path: path.clone(),
            reason: format!("open task panicked: {err}"),
        })??;

        let store = Self {
            db: Arc::new(db),
            path,
        };
        store.ensure_tables().await?;
        Ok(store)
    }

    async fn ensure_tables(&self) -> Result<(), StorageError> {
        self.update(|txn| {
            for table in ALL_TABLES {
                txn.open_table(*table).map_err(|err| StorageError::Transaction {
                    reason: err.to_string(),
                })?;
            }
            Ok(())
        })
        .await
    }

    /// Path this store was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` inside a read transaction on a blocking thread.
    pub async fn view<F, R>(&self, f: F) -> Result<R, StorageError>
    where
        F: FnOnce(&ReadTransaction) -> Result<R, StorageError> + Send + 'static,
        R: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let txn = db.begin_read().map_err(|err| StorageError::Transaction {
                reason: err.to_string(),
            })?;
            f(&txn)
        })
        .await
        .map_err(|err| StorageError::Transaction {
            reason: format!("view task panicked: {err}"),
        })?
    }

    /// Run `f` inside a write transaction on a blocking thread, committing
    /// if `f` returns `Ok`.
    pub async fn update<F, R>(&self, f: F) -> Result<R, StorageError>
    where
        F: FnOnce(&WriteTransaction) -> Result<R, StorageError> + Send + 'static,
        R: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let txn = db.begin_write().map_err(|err| StorageError::Transaction {
                reason: err.to_string(),
            })?;
            let result = f(&txn)?;
            txn.commit().map_err(|err| StorageError::Transaction {
                reason: err.to_string(),
            })?;
            Ok(result)
        })
        .await
        .map_err(|err| StorageError::Transaction {
            reason: format!("update task panicked: {err}"),
        })?
    }

    /// Fetch a single value from `bucket`.
    pub async fn get(&self, bucket: TableDefinition<'static, &str, &str>, key: &str) -> Result<Option<String>, StorageError> {
        let key = key.to_owned();
        self.view(move |txn| {
            let bucket_name = bucket.name().to_owned();
            let table = txn.open_table(bucket).map_err(|err| StorageError::Read {
                bucket: bucket_name.clone(),
                key: key.clone(),
                reason: err.to_string(),
            })?;
            let value = table
                .get(key.as_str())
                .map_err(|err| StorageError::Read {
                    bucket: bucket_name,
                    key: key.clone(),
                    reason: err.to_string(),
                })?
                .map(|v| v.value().to_owned());
            Ok(value)
        })
        .await
    }

    /// Insert or overwrite a single value in `bucket`.
    pub async fn put(&self, bucket: TableDefinition<'static, &str, &str>, key: &str, value: &str) -> Result<(), StorageError> {
        let key = key.to_owned();
        let value = value.to_owned();
        self.update(move |txn| {
            let bucket_name = bucket.name().to_owned();
            let mut table = txn.open_table(bucket).map_err(|err| StorageError::Write {
                bucket: bucket_name.clone(),
                key: key.clone(),
                reason: err.to_string(),
            })?;
            table
                .insert(key.as_str(), value.as_str())
                .map_err(|err| StorageError::Write {
                    bucket: bucket_name,
                    key: key.clone(),
                    reason: err.to_string(),
                })?;
            Ok(())
        })
        .await
    }

    /// Remove a single value from `bucket`, if present.
    pub async fn delete(&self, bucket: TableDefinition<'static, &str, &str>, key: &str) -> Result<(), StorageError> {
        let key = key.to_owned();
        self.update(move |txn| {
            let bucket_name = bucket.name().to_owned();
            let mut table = txn.open_table(bucket).map_err(|err| StorageError::Delete {
                bucket: bucket_name.clone(),
                key: key.clone(),
                reason: err.to_string(),
            })?;
            table
                .remove(key.as_str())
                .map_err(|err| StorageError::Delete {
                    bucket: bucket_name,
                    key: key.clone(),
                    reason: err.to_string(),
                })?;
            Ok(())
        })
        .await
    }

    /// Return every `(key, value)` pair currently in `bucket`.
    pub async fn list(&self, bucket: TableDefinition<'static, &str, &str>) -> Result<Vec<(String, String)>, StorageError> {
        self.view(move |txn| {
            let bucket_name = bucket.name().to_owned();
            let table = txn.open_table(bucket).map_err(|err| StorageError::List {
                bucket: bucket_name.clone(),
                reason: err.to_string(),
            })?;
            let mut out = Vec::new();
            for entry in table.iter().map_err(|err| StorageError::List {
                bucket: bucket_name.clone(),
                reason: err.to_string(),
            })? {
                let (k, v) = entry.map_err(|err| StorageError::List {
                    bucket: bucket_name.clone(),
                    reason: err.to_string(),
                })?;
                out.push((k.value().to_owned(), v.value().to_owned()));
            }
            Ok(out)
        })
        .await
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").field("path", &self.path).finish()
    }
}
