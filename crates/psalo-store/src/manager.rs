use std::path::{Path, PathBuf};

use psalo_config::store::StoreConfig;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::path::resolve_store_path;

/// Owns the process's single read-only connection to the store.
///
/// The connection is opened on first use and kept until [`close`](Self::close).
/// It is a pool capped at one connection, so concurrent callers share it and
/// are served one statement at a time.
pub struct StoreManager {
    path: PathBuf,
    pool: Mutex<Option<SqlitePool>>,
}

impl StoreManager {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pool: Mutex::new(None),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(resolve_store_path(config))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Existence check only; the file's contents are not validated
    pub fn is_ready(&self) -> bool {
        self.path.exists()
    }

    pub async fn is_open(&self) -> bool {
        self.pool.lock().await.is_some()
    }

    /// Shared handle to the store, opening it on first call
    pub async fn connection(&self) -> Result<SqlitePool, StoreError> {
        let mut guard = self.pool.lock().await;

        if let Some(pool) = guard.as_ref() {
            return Ok(pool.clone());
        }

        if !self.is_ready() {
            return Err(StoreError::Unavailable(self.path.clone()));
        }

        let options = SqliteConnectOptions::new()
            .filename(&self.path)
            .read_only(true)
            .create_if_missing(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        tracing::info!("Opened store read-only: {}", self.path.display());
        *guard = Some(pool.clone());

        Ok(pool)
    }

    /// Release the connection. Safe to call when nothing is open.
    pub async fn close(&self) {
        let pool = self.pool.lock().await.take();

        if let Some(pool) = pool {
            pool.close().await;
            tracing::info!("Closed store: {}", self.path.display());
        }
    }
}
