//! Session credential store with write-through persistence.
//!
//! The in-memory copy is the source of truth for the running process;
//! every change is written through to a [`CredentialStorage`] so the
//! session survives restarts.

use std::fmt;
use std::sync::Arc;

use powershare_domain::CredentialPair;
use powershare_domain::credentials::token_preview;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::ports::{CredentialStorage, MemoryCredentialStorage};

/// Thread-safe holder of the current credential pair.
///
/// Clones share the same state.
#[derive(Clone)]
pub struct TokenStore {
    current: Arc<RwLock<Option<CredentialPair>>>,
    storage: Arc<dyn CredentialStorage>,
}

impl TokenStore {
    /// Creates a store backed by `storage`, starting from whatever pair it
    /// holds. A pair missing either token is treated as no pair.
    pub async fn load(storage: Arc<dyn CredentialStorage>) -> Self {
        let current = match storage.load().await {
            Ok(pair) => pair.filter(CredentialPair::is_complete),
            Err(e) => {
                warn!(error = %e, "could not read stored credentials, starting signed out");
                None
            }
        };
        debug!(authenticated = current.is_some(), "token store loaded");
        Self {
            current: Arc::new(RwLock::new(current)),
            storage,
        }
    }

    /// Creates an empty store that persists nothing.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            current: Arc::new(RwLock::new(None)),
            storage: Arc::new(MemoryCredentialStorage::default()),
        }
    }

    /// Returns the current pair, if any.
    pub async fn get(&self) -> Option<CredentialPair> {
        self.current.read().await.clone()
    }

    /// Replaces both tokens.
    ///
    /// Persistence failures are logged; the in-memory pair is still updated.
    pub async fn set(&self, pair: CredentialPair) {
        let mut current = self.current.write().await;
        if let Err(e) = self.storage.save(&pair).await {
            warn!(error = %e, "could not persist credentials");
        }
        debug!(access_token = %token_preview(&pair.access_token), "credentials stored");
        *current = Some(pair);
    }

    /// Removes both tokens. Clearing an empty store is a no-op.
    pub async fn clear(&self) {
        let mut current = self.current.write().await;
        if current.take().is_none() {
            return;
        }
        if let Err(e) = self.storage.remove().await {
            warn!(error = %e, "could not remove stored credentials");
        }
        debug!("credentials cleared");
    }

    /// Returns true if a pair is present.
    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use crate::ports::StorageError;

    struct BrokenStorage;

    #[async_trait]
    impl CredentialStorage for BrokenStorage {
        async fn load(&self) -> Result<Option<CredentialPair>, StorageError> {
            Err(StorageError::Serialization("corrupt".to_string()))
        }

        async fn save(&self, _pair: &CredentialPair) -> Result<(), StorageError> {
            Err(StorageError::NoDataDir)
        }

        async fn remove(&self) -> Result<(), StorageError> {
            Err(StorageError::NoDataDir)
        }
    }

    #[tokio::test]
    async fn test_set_get_clear() {
        let store = TokenStore::in_memory();
        assert!(!store.is_authenticated().await);

        store.set(CredentialPair::new("a1", "r1")).await;
        assert_eq!(store.get().await, Some(CredentialPair::new("a1", "r1")));
        assert!(store.is_authenticated().await);

        store.clear().await;
        assert_eq!(store.get().await, None);

        // Clearing twice is fine.
        store.clear().await;
        assert!(!store.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_writes_through_to_storage() {
        let storage = Arc::new(MemoryCredentialStorage::default());
        let store = TokenStore::load(storage.clone()).await;

        store.set(CredentialPair::new("a1", "r1")).await;
        assert_eq!(
            storage.load().await.expect("load"),
            Some(CredentialPair::new("a1", "r1"))
        );

        store.clear().await;
        assert_eq!(storage.load().await.expect("load"), None);
    }

    #[tokio::test]
    async fn test_load_restores_previous_session() {
        let storage = Arc::new(MemoryCredentialStorage::with_pair(CredentialPair::new(
            "a1", "r1",
        )));

        let store = TokenStore::load(storage).await;

        assert_eq!(store.get().await, Some(CredentialPair::new("a1", "r1")));
    }

    #[tokio::test]
    async fn test_load_ignores_half_pair() {
        let storage = Arc::new(MemoryCredentialStorage::with_pair(CredentialPair::new(
            "a1", "",
        )));

        let store = TokenStore::load(storage).await;

        assert!(!store.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_storage_failures_do_not_break_the_store() {
        let store = TokenStore::load(Arc::new(BrokenStorage)).await;
        assert!(!store.is_authenticated().await);

        store.set(CredentialPair::new("a1", "r1")).await;
        assert_eq!(store.get().await, Some(CredentialPair::new("a1", "r1")));

        store.clear().await;
        assert!(!store.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = TokenStore::in_memory();
        let other = store.clone();

        store.set(CredentialPair::new("a1", "r1")).await;

        assert!(other.is_authenticated().await);
    }
}
