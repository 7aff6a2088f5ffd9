//! `SQLite` implementation of the `KeyValueStore` trait.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::{debug, info};

use storyreel_core::clock::{Clock, SystemClock};
use storyreel_core::error::DomainError;
use storyreel_core::store::KeyValueStore;

use crate::schema::CREATE_READER_STATE_TABLE;

/// SQLite-backed key-value store.
#[derive(Clone)]
pub struct SqliteKeyValueStore {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for SqliteKeyValueStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteKeyValueStore")
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

impl SqliteKeyValueStore {
    /// Creates a store over an existing pool. Call `ensure_schema` before
    /// first use.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_clock(pool, Arc::new(SystemClock))
    }

    /// Creates a store that stamps rows with `clock`.
    #[must_use]
    pub fn with_clock(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    /// Opens a pool for `url` and creates the table if needed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the database cannot be
    /// opened or the schema cannot be created.
    pub async fn connect(url: &str) -> Result<Self, DomainError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
            .map_err(|e| DomainError::Infrastructure(format!("opening {url} failed: {e}")))?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        info!(url, "reader state database ready");
        Ok(store)
    }

    /// Creates the `reader_state` table if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the statement fails.
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        sqlx::query(CREATE_READER_STATE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Infrastructure(format!("creating schema failed: {e}")))?;
        Ok(())
    }

    /// Returns the underlying pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl KeyValueStore for SqliteKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM reader_state WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::PersistenceRead(format!("{key}: {e}")))?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let updated_at = self.clock.now().to_rfc3339();
        sqlx::query(
            "INSERT INTO reader_state (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT (key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(&updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::PersistenceWrite(format!("{key}: {e}")))?;
        debug!(key, "reader state row upserted");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM reader_state WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::PersistenceWrite(format!("{key}: {e}")))?;
        Ok(())
    }
}
