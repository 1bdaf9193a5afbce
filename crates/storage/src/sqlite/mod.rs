use std::time::Duration;

use async_trait::async_trait;
use sqlx::{Row, SqlitePool, sqlite::SqlitePoolOptions};
use thiserror::Error;
use trainer_core::model::{Passage, Session, UserInput};

use crate::repository::{SessionStore, StorageError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Session store backed by a single-row `SQLite` table.
///
/// The passage snapshot, active index, and completion list live in one row
/// and are replaced in a single statement, so a crash can never leave the
/// three parts disagreeing with each other.
#[derive(Clone)]
pub struct SqliteSessionStore {
    pool: SqlitePool,
}

impl SqliteSessionStore {
    /// Connect to `SQLite` using the given URL.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the connection cannot be established or
    /// if the setup pragmas fail.
    pub async fn connect(database_url: &str) -> Result<Self, SqliteInitError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    sqlx::query("PRAGMA journal_mode = WAL;")
                        .execute(&mut *conn)
                        .await?;
                    sqlx::query("PRAGMA busy_timeout = 5000;")
                        .execute(&mut *conn)
                        .await?;
                    Ok(())
                })
            })
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the snapshot table if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the schema query fails.
    pub async fn migrate(&self) -> Result<(), SqliteInitError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS session_snapshot (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                passage TEXT NOT NULL,
                active_index INTEGER NOT NULL CHECK (active_index >= 0),
                completion TEXT NOT NULL
            );
            ",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn load(&self) -> Result<Option<Session>, StorageError> {
        let row = sqlx::query(
            "SELECT passage, active_index, completion FROM session_snapshot WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let passage_json: String = row.try_get("passage").map_err(ser)?;
        let active_index: i64 = row.try_get("active_index").map_err(ser)?;
        let completion_json: String = row.try_get("completion").map_err(ser)?;

        let passage: Passage = serde_json::from_str(&passage_json).map_err(ser)?;
        let completion: Vec<UserInput> = serde_json::from_str(&completion_json).map_err(ser)?;
        let active_index = usize::try_from(active_index).map_err(ser)?;

        let session = Session::from_parts(passage, active_index, completion).map_err(ser)?;
        Ok(Some(session))
    }

    async fn save(&self, session: &Session) -> Result<(), StorageError> {
        let passage = serde_json::to_string(session.passage()).map_err(ser)?;
        let completion = serde_json::to_string(session.completion_status()).map_err(ser)?;
        let active_index = i64::try_from(session.active_paragraph_index()).map_err(ser)?;

        sqlx::query(
            r"
            INSERT INTO session_snapshot (id, passage, active_index, completion)
            VALUES (1, ?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                passage = excluded.passage,
                active_index = excluded.active_index,
                completion = excluded.completion
            ",
        )
        .bind(passage)
        .bind(active_index)
        .bind(completion)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM session_snapshot WHERE id = 1")
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }
}
