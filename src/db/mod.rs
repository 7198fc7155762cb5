//! Database module.
//!
//! This module provides SQLite connectivity, the `emails` schema and the
//! repository used by both API adapters.

mod email;
mod repository;
mod schema;

pub use email::{BatchQuery, EmailEntry, EmailUpdate, BATCH_QUERY_ERROR};
pub use repository::EmailRepository;
pub use schema::{CREATE_EMAILS_TABLE, EMAILS_TABLE};

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::{MailError, Result};

/// Database handle shared by every request of both adapters.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the database at the specified path.
    ///
    /// If the database file doesn't exist, it will be created. Connectivity
    /// is verified and the `emails` table is ensured before returning.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Using database {:?}", path);

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| MailError::DatabaseConnection(e.to_string()))?;

        let db = Self { pool };
        db.ping().await?;
        db.ensure_schema().await?;

        Ok(db)
    }

    /// Open an in-memory database for testing.
    ///
    /// The pool holds exactly one connection that never expires; the
    /// database lives as long as that connection.
    pub async fn open_in_memory() -> Result<Self> {
        debug!("Opening in-memory database");
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| MailError::DatabaseConnection(e.to_string()))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| MailError::DatabaseConnection(e.to_string()))?;

        let db = Self { pool };
        db.ensure_schema().await?;

        Ok(db)
    }

    /// Get a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Verify that the database answers queries.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| MailError::DatabaseConnection(e.to_string()))?;
        Ok(())
    }

    /// Create the `emails` table unless it already exists.
    ///
    /// An "already exists" failure is logged and treated as success; any
    /// other failure is returned.
    pub async fn ensure_schema(&self) -> Result<()> {
        match sqlx::query(CREATE_EMAILS_TABLE).execute(&self.pool).await {
            Ok(_) => {
                info!("Created table {}", EMAILS_TABLE);
                Ok(())
            }
            Err(e) if is_already_exists(&e) => {
                info!("Table {} already exists", EMAILS_TABLE);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Check if a table exists.
    #[cfg(test)]
    pub(crate) async fn table_exists(&self, table_name: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name=?)",
        )
        .bind(table_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Close every connection in the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish()
    }
}

fn is_already_exists(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.message().contains("already exists"))
}
