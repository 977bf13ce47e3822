use async_trait::async_trait;
use chrono::{DateTime, Utc};
use conceptly_core::model::AuthTokens;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted token pair together with the moment it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTokens {
    pub tokens: AuthTokens,
    pub saved_at: DateTime<Utc>,
}

/// Repository contract for the signed-in user's token pair.
///
/// At most one pair is stored; saving replaces the previous one.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Fetch the stored pair, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be read.
    async fn load_tokens(&self) -> Result<Option<StoredTokens>, StorageError>;

    /// Persist a pair, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the pair cannot be stored.
    async fn save_tokens(
        &self,
        tokens: &AuthTokens,
        saved_at: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// Remove the stored pair. Clearing an empty store is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be written.
    async fn clear_tokens(&self) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    tokens: Arc<Mutex<Option<StoredTokens>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(Mutex::new(None)),
        }
    }
}

#[async_trait]
impl TokenRepository for InMemoryRepository {
    async fn load_tokens(&self) -> Result<Option<StoredTokens>, StorageError> {
        let guard = self
            .tokens
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save_tokens(
        &self,
        tokens: &AuthTokens,
        saved_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .tokens
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(StoredTokens {
            tokens: tokens.clone(),
            saved_at,
        });
        Ok(())
    }

    async fn clear_tokens(&self) -> Result<(), StorageError> {
        let mut guard = self
            .tokens
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// Aggregates the repositories the services need.
#[derive(Clone)]
pub struct Storage {
    pub tokens: Arc<dyn TokenRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let tokens: Arc<dyn TokenRepository> = Arc::new(InMemoryRepository::new());
        Self { tokens }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conceptly_core::time::fixed_now;

    #[tokio::test]
    async fn in_memory_save_and_load() {
        let repo = InMemoryRepository::new();
        assert!(repo.load_tokens().await.unwrap().is_none());

        let tokens = AuthTokens::new("access", "refresh");
        repo.save_tokens(&tokens, fixed_now()).await.unwrap();

        let stored = repo.load_tokens().await.unwrap().expect("stored pair");
        assert_eq!(stored.tokens, tokens);
        assert_eq!(stored.saved_at, fixed_now());
    }

    #[tokio::test]
    async fn saving_replaces_previous_pair() {
        let repo = InMemoryRepository::new();
        repo.save_tokens(&AuthTokens::new("a1", "r1"), fixed_now())
            .await
            .unwrap();
        repo.save_tokens(&AuthTokens::new("a2", "r2"), fixed_now())
            .await
            .unwrap();

        let stored = repo.load_tokens().await.unwrap().unwrap();
        assert_eq!(stored.tokens.access_token, "a2");
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let storage = Storage::in_memory();
        storage.tokens.clear_tokens().await.unwrap();
        storage
            .tokens
            .save_tokens(&AuthTokens::new("a", "r"), fixed_now())
            .await
            .unwrap();
        storage.tokens.clear_tokens().await.unwrap();
        assert!(storage.tokens.load_tokens().await.unwrap().is_none());
    }
}
