//! Durable key-value medium
//!
//! Persisted application state is a handful of string values under fixed
//! keys. [`SqliteStore`] keeps them in a single-table SQLite database;
//! [`MemoryStore`] keeps them in process memory and can be told to fail
//! reads or writes for individual keys, which the tests use to exercise the
//! recovery paths of the persistence bridge.

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::StorageError;

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// String-keyed, string-valued durable storage
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Get the value for a key. Returns None if the key does not exist.
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Insert or replace the value for a key.
    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database file at `db_path`
    pub async fn open(db_path: &Path) -> StorageResult<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Forward slashes keep the URL valid on Windows too; mode=rwc
        // creates the file when it does not exist yet.
        let path_str = db_path.to_string_lossy().replace('\\', "/");
        let db_url = format!("sqlite://{}?mode=rwc", path_str);

        let pool = SqlitePool::connect(&db_url).await?;
        Self::from_pool(pool).await
    }

    /// Private in-memory database, gone when the store is dropped
    pub async fn in_memory() -> StorageResult<Self> {
        // Every connection to :memory: is a separate database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> StorageResult<Self> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM kv WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let now = chrono::Utc::now().timestamp();

        sqlx::query(
            r#"
            INSERT INTO kv (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[derive(Default)]
struct MemoryInner {
    values: HashMap<String, String>,
    failing_reads: HashSet<String>,
    failing_writes: HashSet<String>,
    write_count: usize,
}

/// In-process store; clones share the same contents
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the given entries
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::new();
        {
            let mut inner = store.lock();
            for (key, value) in entries {
                inner.values.insert(key.to_string(), value.to_string());
            }
        }
        store
    }

    /// Make every subsequent read of `key` fail
    pub fn fail_reads(&self, key: &str) {
        self.lock().failing_reads.insert(key.to_string());
    }

    /// Make every subsequent write of `key` fail
    pub fn fail_writes(&self, key: &str) {
        self.lock().failing_writes.insert(key.to_string());
    }

    /// Raw value currently held for `key`
    pub fn value(&self, key: &str) -> Option<String> {
        self.lock().values.get(key).cloned()
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> usize {
        self.lock().write_count
    }

    fn lock(&self) -> MutexGuard<'_, MemoryInner> {
        // The map is always left consistent, so a poisoned lock is still usable.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn simulated_failure(key: &str, op: &str) -> StorageError {
        StorageError::IoError(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("simulated {} failure for key '{}'", op, key),
        ))
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let inner = self.lock();
        if inner.failing_reads.contains(key) {
            return Err(Self::simulated_failure(key, "read"));
        }
        Ok(inner.values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut inner = self.lock();
        if inner.failing_writes.contains(key) {
            return Err(Self::simulated_failure(key, "write"));
        }
        inner.values.insert(key.to_string(), value.to_string());
        inner.write_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_sqlite_set_get_overwrite() {
        let store = SqliteStore::in_memory().await.unwrap();

        assert_eq!(store.get("theme").await.unwrap(), None);

        store.set("theme", "dark").await.unwrap();
        assert_eq!(store.get("theme").await.unwrap(), Some("dark".to_string()));

        store.set("theme", "light").await.unwrap();
        assert_eq!(store.get("theme").await.unwrap(), Some("light".to_string()));
        assert_eq!(store.get("favourites").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sqlite_values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("state.db");

        {
            let store = SqliteStore::open(&db_path).await.unwrap();
            store.set("favourites", "[1,2,3]").await.unwrap();
        }

        let store = SqliteStore::open(&db_path).await.unwrap();
        assert_eq!(
            store.get("favourites").await.unwrap(),
            Some("[1,2,3]".to_string())
        );
    }

    #[tokio::test]
    async fn test_memory_store_failures_are_per_key() {
        let store = MemoryStore::with_entries([("theme", "dark"), ("auth", "{}")]);
        store.fail_reads("auth");
        store.fail_writes("theme");

        assert!(store.get("auth").await.is_err());
        assert_eq!(store.get("theme").await.unwrap(), Some("dark".to_string()));

        assert!(store.set("theme", "light").await.is_err());
        assert_eq!(store.value("theme"), Some("dark".to_string()));

        store.set("favourites", "[]").await.unwrap();
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_memory_store_clones_share_contents() {
        let store = MemoryStore::new();
        let clone = store.clone();

        clone.set("theme", "dark").await.unwrap();
        assert_eq!(store.value("theme"), Some("dark".to_string()));
    }
}
