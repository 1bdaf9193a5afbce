use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use thiserror::Error;
use trainer_core::model::Session;

/// Errors surfaced by session storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persistence port for the session aggregate.
///
/// The passage snapshot, active index, and completion list are read and
/// written as a single unit; an adapter must never expose a partially
/// written session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the persisted session, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be read or decoded.
    async fn load(&self) -> Result<Option<Session>, StorageError>;

    /// Persist the session, replacing any previous snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the session cannot be stored.
    async fn save(&self, session: &Session) -> Result<(), StorageError>;

    /// Erase the persisted session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be removed.
    async fn clear(&self) -> Result<(), StorageError>;
}

/// Simple in-memory store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    slot: Arc<Mutex<Option<Session>>>,
}

impl InMemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self) -> Result<Option<Session>, StorageError> {
        let guard = self
            .slot
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save(&self, session: &Session) -> Result<(), StorageError> {
        let mut guard = self
            .slot
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let mut guard = self
            .slot
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trainer_core::model::{Difficulty, Paragraph, Passage, PassageId, Role};

    fn build_session() -> Session {
        let passage = Passage::new(PassageId::new("1"), "Reefs", Difficulty::Easy, "Coral.")
            .with_paragraphs(vec![Paragraph {
                text: "Coral.".into(),
                role: Role::Context,
                summary: "About coral.".into(),
                pivots: Vec::new(),
            }]);
        Session::new(passage).unwrap()
    }

    #[tokio::test]
    async fn round_trips_session() {
        let store = InMemorySessionStore::new();
        assert!(store.load().await.unwrap().is_none());

        let session = build_session();
        store.save(&session).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(session));
    }

    #[tokio::test]
    async fn clear_leaves_nothing_behind() {
        let store = InMemorySessionStore::new();
        store.save(&build_session()).await.unwrap();
        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }
}
