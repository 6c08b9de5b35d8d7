//! Database layer for Staffboard
//!
//! Persists staff reviews in SQLite and serves them to the review selector
//! through the [`staffboard_core::ReviewStore`] port.

pub mod error;
pub mod repos;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub use error::{Error, Result};
pub use repos::reviews::ReviewsRepo;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Database connection pool
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database connection from a file path
    pub async fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        Self::with_max_connections(db_path, DEFAULT_MAX_CONNECTIONS).await
    }

    /// Create a new database connection with a bounded pool size
    pub async fn with_max_connections(
        db_path: impl AsRef<Path>,
        max_connections: u32,
    ) -> Result<Self> {
        let db_path = db_path.as_ref();

        // Create parent directory if needed
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Io(format!("Failed to create database directory: {}", e)))?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path.display()))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;

        tracing::debug!(path = %db_path.display(), "Opened review database");
        Self::migrated(pool).await
    }

    /// Open the database described by the application configuration
    pub async fn open(config: &staffboard_core::config::DatabaseConfig) -> Result<Self> {
        let path = match &config.path {
            Some(path) => path.clone(),
            None => Self::default_path()?,
        };
        Self::with_max_connections(path, config.max_connections).await
    }

    /// Create an in-memory database for testing
    ///
    /// Every pooled connection to `sqlite::memory:` sees its own database,
    /// so the pool holds exactly one connection that never expires.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::migrated(pool).await
    }

    /// Get the default database path (~/.cache/staffboard/staffboard.db)
    pub fn default_path() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| Error::Io("Could not determine cache directory".to_string()))?;
        Ok(cache_dir.join("staffboard").join("staffboard.db"))
    }

    async fn migrated(pool: SqlitePool) -> Result<Self> {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| Error::Migration(e.to_string()))?;
        Ok(Self { pool })
    }

    /// Get the underlying connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get the reviews repository
    pub fn reviews(&self) -> ReviewsRepo {
        ReviewsRepo::new(self.pool.clone())
    }

    /// Close the database connection
    pub async fn close(self) {
        self.pool.close().await;
    }
}
